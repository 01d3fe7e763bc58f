use crate::models::{Gender, Goal, UserProfile};

/// The activity multipliers the app offers, sedentary through very active.
pub const ACTIVITY_LEVELS: [f64; 4] = [1.2, 1.375, 1.55, 1.725];

/// Flat calorie shift applied for a lose/gain goal.
const GOAL_CALORIE_SHIFT: i32 = 500;

/// Derived calorie and macro targets, grams rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroTargets {
    /// kcal
    pub calories: i32,
    /// Grams
    pub protein: i32,
    /// Grams
    pub carbs: i32,
    /// Grams
    pub fat: i32,
}

/// Biometric form input; targets are derived from this, never entered.
#[derive(Debug, Clone, Copy)]
pub struct Biometrics {
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: f64,
    pub goal: Goal,
    pub target_weight: Option<f64>,
}

/// Compute calorie and macro targets from biometrics.
///
/// BMR is the Mifflin-St Jeor estimate. The goal shift is applied to the
/// calorie target before the macro split, so macros always reflect the
/// adjusted calories. The split is fixed at 25% protein, 25% fat, 50%
/// carbs, at 4/9/4 kcal per gram.
///
/// Pure and total: inputs are not validated here. Callers are expected to
/// reject non-positive weight/height/age before invoking; garbage in,
/// garbage targets out.
pub fn compute_targets(
    weight: f64,
    height: f64,
    age: u32,
    gender: Gender,
    activity_level: f64,
    goal: Goal,
) -> MacroTargets {
    let bmr = match gender {
        Gender::Male => 10.0 * weight + 6.25 * height - 5.0 * age as f64 + 5.0,
        Gender::Female => 10.0 * weight + 6.25 * height - 5.0 * age as f64 - 161.0,
    };

    let mut calories = (bmr * activity_level).round() as i32;
    match goal {
        Goal::Lose => calories -= GOAL_CALORIE_SHIFT,
        Goal::Gain => calories += GOAL_CALORIE_SHIFT,
        Goal::Maintain => {}
    }

    let kcal = calories as f64;
    MacroTargets {
        calories,
        protein: (kcal * 0.25 / 4.0).round() as i32,
        fat: (kcal * 0.25 / 9.0).round() as i32,
        carbs: (kcal * 0.50 / 4.0).round() as i32,
    }
}

impl UserProfile {
    /// Build a profile from onboarding input, deriving the targets.
    pub fn new(bio: Biometrics) -> Self {
        let t = compute_targets(
            bio.weight,
            bio.height,
            bio.age,
            bio.gender,
            bio.activity_level,
            bio.goal,
        );
        Self {
            weight: bio.weight,
            height: bio.height,
            age: bio.age,
            gender: bio.gender,
            activity_level: bio.activity_level,
            goal: bio.goal,
            target_weight: bio.target_weight,
            target_calories: t.calories,
            target_protein: t.protein,
            target_carbs: t.carbs,
            target_fat: t.fat,
        }
    }

    /// Replace the biometric fields and recompute every target.
    pub fn update(&mut self, bio: Biometrics) {
        *self = Self::new(bio);
    }

    pub fn targets(&self) -> MacroTargets {
        MacroTargets {
            calories: self.target_calories,
            protein: self.target_protein,
            carbs: self.target_carbs,
            fat: self.target_fat,
        }
    }

    /// Body mass index from the stored weight and height.
    pub fn bmi(&self) -> f64 {
        let height_m = self.height / 100.0;
        self.weight / (height_m * height_m)
    }
}
