//! Numbered console menu.
//!
//! Reads one choice per line from any `BufRead` and writes to any `Write`,
//! so the whole loop runs in tests against in-memory buffers. Operation
//! failures are printed and the loop continues; it ends on `0` at the main
//! menu or at end of input.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::app::{App, EvalChart};
use crate::report;

pub struct Menu<'a, R, W> {
    app: &'a mut App,
    input: R,
    out: W,
}

/// What a sub-menu asks its caller to do next.
enum Flow {
    Continue,
    Quit,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(app: &'a mut App, input: R, out: W) -> Self {
        Self { app, input, out }
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let horizons = self
                .app
                .config()
                .prediction
                .horizons
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(self.out)?;
            writeln!(
                self.out,
                "=== pricecast: {} vs {} ===",
                self.app.target_symbol(),
                self.app.factor_symbol()
            )?;
            let status = match self.app.session().model() {
                Some(model) => format!("[ TRAINED: {}-day ]", model.horizon),
                None => "[ NOT TRAINED ]".to_string(),
            };
            writeln!(self.out, "Evaluation model {status}")?;
            writeln!(self.out, "1. Charts")?;
            writeln!(
                self.out,
                "2. Train {}-day evaluation model",
                self.app.config().prediction.evaluation_horizon
            )?;
            writeln!(self.out, "3. Run predictions and log ({horizons} days)")?;
            writeln!(self.out, "4. Ticker info")?;
            writeln!(self.out, "0. Exit")?;

            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.charts_menu()?,
                "2" => {
                    self.train()?;
                    Flow::Continue
                }
                "3" => {
                    self.predict()?;
                    Flow::Continue
                }
                "4" => self.info_menu()?,
                "0" => {
                    writeln!(self.out, "Bye.")?;
                    return Ok(());
                }
                other => {
                    writeln!(self.out, "Invalid option '{other}'.")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn train(&mut self) -> Result<()> {
        writeln!(self.out, "Training...")?;
        match self.app.train_evaluation_model() {
            Ok(model) => {
                report::write_training(&mut self.out, model)?;
                writeln!(self.out, "Evaluation model ready; charts are available.")?;
            }
            Err(e) => writeln!(self.out, "Training failed: {e}")?,
        }
        Ok(())
    }

    fn predict(&mut self) -> Result<()> {
        writeln!(self.out, "Running predictions...")?;
        match self.app.predict() {
            Ok(report) => report::write_prediction(&mut self.out, &report)?,
            Err(e) => writeln!(self.out, "Prediction run failed: {e}")?,
        }
        Ok(())
    }

    /// Ask for target or factor; `Ok(None)` means back (or end of input,
    /// reported through `eof`).
    fn pick_symbol(&mut self, title: &str, eof: &mut bool) -> Result<Option<String>> {
        let (target, factor) = (
            self.app.target_symbol().to_string(),
            self.app.factor_symbol().to_string(),
        );
        writeln!(self.out)?;
        writeln!(self.out, "--- {title} ---")?;
        writeln!(self.out, "1. {target}")?;
        writeln!(self.out, "2. {factor}")?;
        writeln!(self.out, "0. Back")?;
        match self.ask("Choice: ")?.as_deref() {
            None => {
                *eof = true;
                Ok(None)
            }
            Some("1") => Ok(Some(target)),
            Some("2") => Ok(Some(factor)),
            Some("0") => Ok(None),
            Some(other) => {
                writeln!(self.out, "Invalid option '{other}'.")?;
                Ok(None)
            }
        }
    }

    fn charts_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.out)?;
            writeln!(self.out, "--- Charts ---")?;
            writeln!(self.out, "1. Candlestick chart")?;
            writeln!(self.out, "2. Evaluation charts")?;
            writeln!(self.out, "0. Back")?;
            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.as_str() {
                "1" => {
                    let mut eof = false;
                    if let Some(symbol) = self.pick_symbol("Candlestick chart", &mut eof)? {
                        match self.app.plot_candles(&symbol) {
                            Ok(path) => writeln!(self.out, "Chart written to {}", path.display())?,
                            Err(e) => writeln!(self.out, "Could not draw chart: {e:#}")?,
                        }
                    }
                    if eof {
                        return Ok(Flow::Quit);
                    }
                }
                "2" => {
                    if let Flow::Quit = self.evaluation_menu()? {
                        return Ok(Flow::Quit);
                    }
                }
                "0" => return Ok(Flow::Continue),
                other => writeln!(self.out, "Invalid option '{other}'.")?,
            }
        }
    }

    fn evaluation_menu(&mut self) -> Result<Flow> {
        if !self.app.session().is_ready() {
            writeln!(
                self.out,
                "No evaluation model. Train one first (main menu option 2)."
            )?;
            return Ok(Flow::Continue);
        }
        loop {
            writeln!(self.out)?;
            writeln!(self.out, "--- Evaluation charts ---")?;
            writeln!(self.out, "1. Feature importance")?;
            writeln!(self.out, "2. Confusion matrix")?;
            writeln!(self.out, "3. Predictions vs reality")?;
            writeln!(self.out, "0. Back")?;
            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(Flow::Quit);
            };
            let chart = match choice.as_str() {
                "1" => EvalChart::Importance,
                "2" => EvalChart::Confusion,
                "3" => EvalChart::Overlay,
                "0" => return Ok(Flow::Continue),
                other => {
                    writeln!(self.out, "Invalid option '{other}'.")?;
                    continue;
                }
            };
            match self.app.plot_evaluation(chart) {
                Ok(path) => writeln!(self.out, "Chart written to {}", path.display())?,
                Err(e) => writeln!(self.out, "Could not draw chart: {e:#}")?,
            }
        }
    }

    fn info_menu(&mut self) -> Result<Flow> {
        let mut eof = false;
        if let Some(symbol) = self.pick_symbol("Ticker info", &mut eof)? {
            match self.app.ticker_info(&symbol) {
                Some(info) => report::write_info(&mut self.out, &info)?,
                None => writeln!(self.out, "No info available for {symbol}.")?,
            }
        }
        Ok(if eof { Flow::Quit } else { Flow::Continue })
    }
}
