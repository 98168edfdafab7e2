//! Brand → generic alias table.

use std::collections::HashMap;

/// Immutable brand-name → generic-name mapping.
///
/// Lookups are case-insensitive on trimmed input.
#[derive(Debug, Clone)]
pub struct DrugAliasTable {
    aliases: HashMap<String, String>,
}

impl Default for DrugAliasTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DrugAliasTable {
    /// Create a table with the default mappings.
    pub fn new() -> Self {
        Self {
            aliases: Self::default_aliases(),
        }
    }

    /// Create a table from explicit (alias, generic) pairs.
    pub fn from_pairs<I, A, G>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, G)>,
        A: AsRef<str>,
        G: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(alias, generic)| (alias.as_ref().trim().to_lowercase(), generic.into()))
                .collect(),
        }
    }

    /// Generic name for a brand name, if mapped.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.aliases
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Default brand mappings.
    fn default_aliases() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Statins
        map.insert("lipitor".into(), "atorvastatin".into());
        map.insert("zocor".into(), "simvastatin".into());
        map.insert("crestor".into(), "rosuvastatin".into());

        // Anticoagulants
        map.insert("coumadin".into(), "warfarin".into());
        map.insert("jantoven".into(), "warfarin".into());

        // Analgesics
        map.insert("tylenol".into(), "acetaminophen".into());
        map.insert("advil".into(), "ibuprofen".into());
        map.insert("motrin".into(), "ibuprofen".into());
        map.insert("aspirin".into(), "acetylsalicylic acid".into());

        // Antidepressants
        map.insert("prozac".into(), "fluoxetine".into());
        map.insert("zoloft".into(), "sertraline".into());
        map.insert("paxil".into(), "paroxetine".into());
        map.insert("lexapro".into(), "escitalopram".into());
        map.insert("celexa".into(), "citalopram".into());
        map.insert("wellbutrin".into(), "bupropion".into());
        map.insert("effexor".into(), "venlafaxine".into());
        map.insert("cymbalta".into(), "duloxetine".into());
        map.insert("nardil".into(), "phenelzine".into());
        map.insert("parnate".into(), "tranylcypromine".into());

        // Antipsychotics
        map.insert("abilify".into(), "aripiprazole".into());
        map.insert("zyprexa".into(), "olanzapine".into());
        map.insert("risperdal".into(), "risperidone".into());
        map.insert("seroquel".into(), "quetiapine".into());
        map.insert("geodon".into(), "ziprasidone".into());
        map.insert("clozaril".into(), "clozapine".into());

        // Cardiovascular
        map.insert("zestril".into(), "lisinopril".into());
        map.insert("prinivil".into(), "lisinopril".into());
        map.insert("aldactone".into(), "spironolactone".into());

        // Antibiotics
        map.insert("cipro".into(), "ciprofloxacin".into());
        map.insert("sumycin".into(), "tetracycline".into());

        // Metabolic
        map.insert("glucophage".into(), "metformin".into());
        map.insert("synthroid".into(), "levothyroxine".into());
        map.insert("levoxyl".into(), "levothyroxine".into());

        map
    }
}
