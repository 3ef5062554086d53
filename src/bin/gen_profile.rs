//! Sample Profile Generator
//!
//! Prints random valid health profiles as JSON lines for manual pipeline
//! testing, e.g. `gen_profile 20 | nidra predict --input - --batch`.

use nidra::types::profile::{BmiCategory, Gender, HealthProfile, SleepDisorder};
use rand::Rng;

/// Generator for random but range-valid profiles
struct ProfileGenerator {
    rng: rand::rngs::ThreadRng,
}

impl ProfileGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a profile of a broadly healthy sleeper
    fn generate_rested(&mut self) -> HealthProfile {
        HealthProfile {
            gender: *self.random_choice(&[Gender::Female, Gender::Male]),
            bmi_category: *self.random_choice(&[BmiCategory::Normal, BmiCategory::Overweight]),
            sleep_disorder: SleepDisorder::Normal,
            age: self.rng.gen_range(18..=65),
            sleep_duration: self.half_hour_steps(6.5, 9.0),
            physical_activity: self.rng.gen_range(30..=120),
            stress_level: self.rng.gen_range(1..=4),
            heart_rate: self.rng.gen_range(55..=80),
            daily_steps: self.rng.gen_range(6000..=15000),
            systolic_bp: self.rng.gen_range(100..=130),
            diastolic_bp: self.rng.gen_range(65..=85),
        }
    }

    /// Generate a profile of a poor sleeper
    fn generate_sleepless(&mut self) -> HealthProfile {
        HealthProfile {
            gender: *self.random_choice(&[Gender::Female, Gender::Male]),
            bmi_category: *self.random_choice(&[
                BmiCategory::Obese,
                BmiCategory::Overweight,
                BmiCategory::Underweight,
            ]),
            sleep_disorder: *self
                .random_choice(&[SleepDisorder::Insomnia, SleepDisorder::SleepApnea]),
            age: self.rng.gen_range(30..=80),
            sleep_duration: self.half_hour_steps(3.0, 5.5),
            physical_activity: self.rng.gen_range(0..=30),
            stress_level: self.rng.gen_range(7..=10),
            heart_rate: self.rng.gen_range(80..=110),
            daily_steps: self.rng.gen_range(500..=4000),
            systolic_bp: self.rng.gen_range(130..=170),
            diastolic_bp: self.rng.gen_range(85..=110),
        }
    }

    /// Random duration on the form's half-hour grid
    fn half_hour_steps(&mut self, min: f64, max: f64) -> f64 {
        let steps = self.rng.gen_range((min * 2.0) as u32..=(max * 2.0) as u32);
        steps as f64 / 2.0
    }

    fn random_choice<'a, T>(&mut self, choices: &'a [T]) -> &'a T {
        &choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let sleepless_rate: f64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0.3);

    let mut generator = ProfileGenerator::new();
    let mut rng = rand::thread_rng();

    for _ in 0..count {
        let profile = if rng.gen_bool(sleepless_rate) {
            generator.generate_sleepless()
        } else {
            generator.generate_rested()
        };

        println!("{}", serde_json::to_string(&profile)?);
    }

    Ok(())
}
