use std::time::Instant;
use crate::config::constants::{DEFAULT_SPLIT, SPLIT_SUM_TOLERANCE};
use crate::enums::commands::Commands;
use crate::errors::{MacrosplitError, MacrosplitResult};
use crate::logger::split_logger::SplitLogger;
use crate::structs::category_set::CategorySet;
use crate::ui::form_server::FormServer;

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            start_time: None,
        }
    }

    pub async fn run_command(&mut self, command: Commands) -> MacrosplitResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Serve { port, budget, no_browser } => self.serve_command(port, budget, no_browser).await,
            Commands::Split { budget, protein, carbs, fat } => self.split_command(budget, protein, carbs, fat),
        };

        if let Some(start) = self.start_time {
            let duration = start.elapsed();
            log::info!("⏱️  Command completed in {:.2}s", duration.as_secs_f64());
        }

        result
    }

    async fn serve_command(&self, port: Option<u16>, budget: f64, no_browser: bool) -> MacrosplitResult<()> {
        log::info!("🚀 Starting the macro calculator form...");

        if !budget.is_finite() || budget < 0.0 {
            return Err(MacrosplitError::validation_error(
                "budget",
                &budget.to_string(),
                "must be a non-negative finite number",
                Some("Try --budget 2000"),
            ));
        }

        let mut server = FormServer::new(budget);
        server.start(port).await?;

        let url = server.url().ok_or_else(||
            MacrosplitError::system_error("serve", "Server started without a port")
        )?;
        log::info!("📋 Form available at {}", url);

        if no_browser {
            log::info!("💡 Open {} in your browser to use the calculator", url);
        } else if let Err(e) = webbrowser::open(&url) {
            log::warn!("⚠️ Could not open the browser automatically: {}", e);
            log::info!("💡 Open {} manually", url);
        }

        log::info!("⌨️  Press Ctrl-C to stop");
        tokio::signal::ctrl_c().await.map_err(|e|
            MacrosplitError::system_error("serve", &format!("Failed to listen for Ctrl-C: {}", e))
        )?;

        server.shutdown().await
    }

    fn split_command(
        &self,
        budget: f64,
        protein: Option<f64>,
        carbs: Option<f64>,
        fat: Option<f64>,
    ) -> MacrosplitResult<()> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(MacrosplitError::validation_error(
                "budget",
                &budget.to_string(),
                "must be a non-negative finite number",
                Some("Try --budget 2000"),
            ));
        }

        let defaults = DEFAULT_SPLIT;
        let split: Vec<(&str, f64)> = vec![
            ("protein", protein.unwrap_or(defaults[0].1)),
            ("carbs", carbs.unwrap_or(defaults[1].1)),
            ("fat", fat.unwrap_or(defaults[2].1)),
        ];

        let sum: f64 = split.iter().map(|(_, p)| p).sum();
        if (sum - 100.0).abs() > SPLIT_SUM_TOLERANCE {
            return Err(MacrosplitError::validation_error(
                "split",
                &format!("{}/{}/{}", split[0].1, split[1].1, split[2].1),
                "percentiles must sum to 100",
                Some("Adjust the values so protein + carbs + fat = 100"),
            ));
        }

        let set = CategorySet::new(budget, &split, true);
        SplitLogger::print_split_table(&set);
        Ok(())
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}
