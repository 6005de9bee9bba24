//! Plan command: prints the scene plan as YAML.

use anyhow::Result;
use clap::Parser;

use crate::cli::HistoryArgs;
use crate::data::{to_yaml, ScenePlan};
use crate::utils::Settings;

/// Plan command options.
#[derive(Parser, Debug, Clone, Default)]
pub struct PlanCommand {
    /// History selection and density flags.
    #[command(flatten)]
    pub history: HistoryArgs,
}

impl PlanCommand {
    /// Executes the plan command.
    pub fn execute(self) -> Result<()> {
        print!("{}", self.render()?);
        Ok(())
    }

    /// Builds the plan YAML without printing it.
    pub fn render(&self) -> Result<String> {
        let settings = Settings::load()?;
        let history = self.history.load(None)?;
        let plan = self.history.plan(&history.commits, &settings.density);
        to_yaml(&ScenePlan::from(&plan))
    }
}
