//! Interaction rule table and food categories.

use std::collections::HashMap;

use crate::models::{normalize_term, InteractionRecord, RiskLevel};

/// Static (drug, food) → interaction rules.
///
/// Iteration order is declaration order, which makes fallback matching
/// deterministic.
#[derive(Debug, Clone)]
pub struct InteractionTable {
    records: Vec<InteractionRecord>,
    index: HashMap<(String, String), usize>,
}

impl Default for InteractionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionTable {
    /// Create a table with the default rules.
    pub fn new() -> Self {
        Self::from_records(Self::default_records())
    }

    /// Build a table from records. A later record with the same key replaces
    /// the earlier one.
    pub fn from_records(records: Vec<InteractionRecord>) -> Self {
        let mut deduped: Vec<InteractionRecord> = Vec::with_capacity(records.len());
        let mut index = HashMap::new();
        for record in records {
            let key = (record.drug.clone(), record.food.clone());
            match index.get(&key) {
                Some(&pos) => deduped[pos] = record,
                None => {
                    index.insert(key, deduped.len());
                    deduped.push(record);
                }
            }
        }
        Self {
            records: deduped,
            index,
        }
    }

    /// Exact lookup after term normalization.
    pub fn get(&self, drug: &str, food: &str) -> Option<&InteractionRecord> {
        self.index
            .get(&(normalize_term(drug), normalize_term(food)))
            .map(|&pos| &self.records[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn default_records() -> Vec<InteractionRecord> {
        vec![
            // Statins
            InteractionRecord::new(
                "atorvastatin",
                "grapefruit",
                RiskLevel::High,
                "Grapefruit inhibits CYP3A4 enzyme, increasing atorvastatin concentration",
                "Increased risk of muscle damage and liver problems",
                "Avoid grapefruit and grapefruit juice while taking atorvastatin",
            ),
            InteractionRecord::new(
                "simvastatin",
                "grapefruit",
                RiskLevel::High,
                "Grapefruit inhibits CYP3A4, increasing simvastatin levels",
                "Higher risk of muscle pain and liver damage",
                "Avoid grapefruit products completely",
            ),
            // Anticoagulants
            InteractionRecord::new(
                "warfarin",
                "spinach",
                RiskLevel::Moderate,
                "Spinach is high in vitamin K, which counteracts warfarin",
                "Reduced anticoagulant effect, increased clotting risk",
                "Maintain consistent vitamin K intake, don't suddenly change diet",
            ),
            InteractionRecord::new(
                "warfarin",
                "cranberry",
                RiskLevel::Moderate,
                "Cranberry may increase warfarin's anticoagulant effect",
                "Increased bleeding risk",
                "Limit cranberry products and monitor for bleeding",
            ),
            // Antibiotics
            InteractionRecord::new(
                "tetracycline",
                "dairy",
                RiskLevel::Moderate,
                "Calcium in dairy products binds to tetracycline",
                "Reduced antibiotic absorption and effectiveness",
                "Take tetracycline 2 hours before or 4 hours after dairy",
            ),
            InteractionRecord::new(
                "ciprofloxacin",
                "dairy",
                RiskLevel::Moderate,
                "Calcium interferes with ciprofloxacin absorption",
                "Decreased antibiotic effectiveness",
                "Avoid dairy products 2 hours before and after taking ciprofloxacin",
            ),
            // Blood pressure
            InteractionRecord::new(
                "lisinopril",
                "banana",
                RiskLevel::Moderate,
                "Bananas are high in potassium, lisinopril can increase potassium levels",
                "Risk of hyperkalemia (high potassium)",
                "Monitor potassium intake, avoid excessive bananas",
            ),
            InteractionRecord::new(
                "spironolactone",
                "banana",
                RiskLevel::Moderate,
                "Both spironolactone and bananas increase potassium",
                "Increased risk of hyperkalemia",
                "Limit high-potassium foods like bananas",
            ),
            // MAOIs
            InteractionRecord::new(
                "phenelzine",
                "aged cheese",
                RiskLevel::High,
                "Aged cheese contains tyramine, MAOIs prevent its breakdown",
                "Tyramine buildup can cause severe hypertension",
                "Avoid aged cheeses, cured meats, and fermented foods",
            ),
            InteractionRecord::new(
                "tranylcypromine",
                "red wine",
                RiskLevel::High,
                "Red wine contains tyramine, MAOIs prevent its metabolism",
                "Dangerous blood pressure spikes",
                "Avoid red wine and other tyramine-rich foods",
            ),
            // Diabetes
            InteractionRecord::new(
                "metformin",
                "alcohol",
                RiskLevel::Moderate,
                "Alcohol can increase metformin's effect on lactic acid",
                "Increased risk of lactic acidosis",
                "Limit alcohol consumption while taking metformin",
            ),
            // Thyroid
            InteractionRecord::new(
                "levothyroxine",
                "soy",
                RiskLevel::Moderate,
                "Soy can interfere with levothyroxine absorption",
                "Reduced thyroid hormone effectiveness",
                "Take levothyroxine 4 hours before or after soy products",
            ),
            InteractionRecord::new(
                "levothyroxine",
                "iron supplements",
                RiskLevel::Moderate,
                "Iron can bind to levothyroxine in the gut",
                "Decreased thyroid hormone absorption",
                "Separate iron supplements by 4 hours from levothyroxine",
            ),
        ]
    }
}

/// A named group of related food terms.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodCategory {
    pub name: String,
    pub members: Vec<String>,
}

impl FoodCategory {
    pub fn new(name: &str, members: &[&str]) -> Self {
        Self {
            name: normalize_term(name),
            members: members.iter().map(|m| normalize_term(m)).collect(),
        }
    }

    /// Whether a term belongs to this category. The category's own name
    /// counts as a member.
    pub fn contains(&self, term: &str) -> bool {
        let term = normalize_term(term);
        self.name == term || self.members.iter().any(|m| *m == term)
    }
}

/// Food categories in fixed precedence order.
///
/// When a food belongs to several categories, earlier categories are tried
/// first.
#[derive(Debug, Clone)]
pub struct FoodCategoryTable {
    categories: Vec<FoodCategory>,
}

impl Default for FoodCategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodCategoryTable {
    pub fn new() -> Self {
        Self::from_categories(vec![
            FoodCategory::new("grapefruit", &["grapefruit", "grapefruit juice", "citrus"]),
            FoodCategory::new(
                "dairy",
                &["milk", "cheese", "yogurt", "cream", "butter", "ice cream"],
            ),
            FoodCategory::new(
                "high_potassium",
                &["banana", "potato", "tomato", "avocado", "spinach", "kale"],
            ),
            FoodCategory::new(
                "high_vitamin_k",
                &["spinach", "kale", "broccoli", "brussels sprouts", "cabbage"],
            ),
            FoodCategory::new(
                "tyramine_rich",
                &["aged cheese", "cured meat", "salami", "pepperoni", "red wine", "beer"],
            ),
            FoodCategory::new(
                "iron_rich",
                &["red meat", "spinach", "beans", "lentils", "iron supplements"],
            ),
        ])
    }

    pub fn from_categories(categories: Vec<FoodCategory>) -> Self {
        Self { categories }
    }

    /// Categories containing `term`, in precedence order.
    pub fn categories_of<'a>(
        &'a self,
        term: &'a str,
    ) -> impl Iterator<Item = &'a FoodCategory> + 'a {
        self.categories.iter().filter(move |c| c.contains(term))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodCategory> {
        self.categories.iter()
    }
}
