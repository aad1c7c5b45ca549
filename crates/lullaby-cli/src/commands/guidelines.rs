use lullaby_core::{EngineConfig, SleepEngine};

use super::input::{print_json, ChildArgs};

pub fn run(child: ChildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let clock = child.clock(&config)?;
    let guidelines = SleepEngine::new(config).guidelines(child.birth_date, &clock)?;
    print_json(&guidelines)
}
