use serde::{Deserialize, Serialize};

/// Points each factor contributes at full credit; together they make up the
/// 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub tech_stack: f64,
    pub experience: f64,
    pub rate: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tech_stack: 50.0,
            experience: 30.0,
            rate: 20.0,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.tech_stack + self.experience + self.rate
    }
}
