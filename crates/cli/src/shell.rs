//! The menu loop.
//!
//! Reads one answer per line. End of input behaves like choosing "Exit".

use std::io::{self, BufRead, Write};

use thiserror::Error;

use stockcast_core::DomainError;
use stockcast_infra::{InventoryService, ProductStore};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

enum Input {
    Line(String),
    Eof,
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, S, R, W> {
    service: &'a InventoryService<S>,
    input: R,
    output: W,
}

impl<'a, S, R, W> Shell<'a, S, R, W>
where
    S: ProductStore,
    R: BufRead,
    W: Write,
{
    pub fn new(service: &'a InventoryService<S>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            writeln!(self.output, "\nInventory Management System")?;
            writeln!(self.output, "1. Add Product")?;
            writeln!(self.output, "2. Record Sale")?;
            writeln!(self.output, "3. Get Forecast")?;
            writeln!(self.output, "4. Exit")?;

            let choice = match self.prompt("\nEnter your choice (1-4): ")? {
                Input::Line(line) => line,
                Input::Eof => String::from("4"),
            };

            let flow = match choice.as_str() {
                "1" => self.add_product()?,
                "2" => self.record_sale()?,
                "3" => self.forecast()?,
                "4" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid choice! Please try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                writeln!(self.output, "Exiting...")?;
                self.output.flush()?;
                return Ok(());
            }
        }
    }

    fn prompt(&mut self, text: &str) -> Result<Input, ShellError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Input::Eof);
        }
        Ok(Input::Line(line.trim().to_string()))
    }

    /// Prompt for an integer. `Ok(None)` means "back to the menu" (after
    /// reporting the problem) and `Err` is terminal I/O failure only.
    fn prompt_int(&mut self, text: &str) -> Result<Option<i64>, ShellError> {
        let Input::Line(line) = self.prompt(text)? else {
            return Ok(None);
        };
        match line.parse::<i64>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                writeln!(self.output, "Please enter a whole number.")?;
                Ok(None)
            }
        }
    }

    fn prompt_line(&mut self, text: &str) -> Result<Option<String>, ShellError> {
        match self.prompt(text)? {
            Input::Line(line) => Ok(Some(line)),
            Input::Eof => Ok(None),
        }
    }

    fn report(&mut self, err: DomainError) -> Result<Flow, ShellError> {
        tracing::warn!(error = %err, "command rejected");
        match err {
            DomainError::NotFound(_) => writeln!(self.output, "Product not found!")?,
            other => writeln!(self.output, "Error: {other}")?,
        }
        Ok(Flow::Continue)
    }

    fn add_product(&mut self) -> Result<Flow, ShellError> {
        let Some(id) = self.prompt_line("Enter product ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = self.prompt_line("Enter product name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(shelf_life) = self.prompt_int("Enter shelf life (days): ")? else {
            return Ok(Flow::Continue);
        };

        match self.service.register_product(&id, &name, shelf_life) {
            Ok(summary) => {
                writeln!(self.output, "Product {} added successfully!", summary.name)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(e),
        }
    }

    fn record_sale(&mut self) -> Result<Flow, ShellError> {
        let Some(id) = self.prompt_line("Enter product ID: ")? else {
            return Ok(Flow::Exit);
        };
        // Look the product up before asking for a quantity.
        let product = match self.service.product(&id) {
            Ok(p) => p,
            Err(e) => return self.report(e),
        };
        let Some(quantity) = self.prompt_int("Enter quantity sold: ")? else {
            return Ok(Flow::Continue);
        };

        match self.service.record_sale(&id, quantity) {
            Ok(receipt) => {
                writeln!(
                    self.output,
                    "Sale recorded for {} units of {}",
                    receipt.quantity, product.name
                )?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(e),
        }
    }

    fn forecast(&mut self) -> Result<Flow, ShellError> {
        let Some(id) = self.prompt_line("Enter product ID: ")? else {
            return Ok(Flow::Exit);
        };
        if let Err(e) = self.service.product(&id) {
            return self.report(e);
        }
        let Some(days) = self.prompt_int("Enter number of days to forecast: ")? else {
            return Ok(Flow::Continue);
        };

        match self.service.get_forecast(&id, days) {
            Ok(report) => {
                writeln!(self.output, "\nForecast for next {days} days:")?;
                writeln!(self.output, "- Predicted sales: {} units", report.predicted_units)?;
                writeln!(self.output, "- Recommended order: {} units", report.recommended_order)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcast_infra::InMemoryProductStore;

    fn run_script(service: &InventoryService<InMemoryProductStore>, script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(service, script.as_bytes(), &mut out).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn full_session_matches_apple_example() {
        let service = InventoryService::in_memory();
        let script = "1\nA1\nApple\n7\n2\nA1\n10\n2\nA1\n15\n2\nA1\n12\n3\nA1\n7\n4\n";
        let out = run_script(&service, script);

        assert!(out.contains("Product Apple added successfully!"));
        assert!(out.contains("Sale recorded for 15 units of Apple"));
        assert!(out.contains("Forecast for next 7 days:"));
        assert!(out.contains("- Predicted sales: 94 units"));
        assert!(out.contains("- Recommended order: 94 units"));
        assert!(out.trim_end().ends_with("Exiting..."));
    }

    #[test]
    fn unknown_product_and_bad_choice_are_reported() {
        let service = InventoryService::in_memory();
        let out = run_script(&service, "2\nnope\n9\n4\n");

        assert!(out.contains("Product not found!"));
        assert!(out.contains("Invalid choice! Please try again."));
    }

    #[test]
    fn domain_errors_keep_the_loop_running() {
        let service = InventoryService::in_memory();
        service.register_product("A1", "Apple", 7).unwrap();

        let out = run_script(&service, "3\nA1\n0\n1\nA1\nAgain\n7\n4\n");
        assert!(out.contains("invalid horizon: must be a positive integer"));
        assert!(out.contains("product already exists: A1"));
        assert_eq!(service.product("A1").unwrap().name, "Apple");
    }

    #[test]
    fn non_numeric_input_returns_to_menu() {
        let service = InventoryService::in_memory();
        let out = run_script(&service, "1\nA1\nApple\nseven\n4\n");

        assert!(out.contains("Please enter a whole number."));
        assert!(service.list_products().is_empty());
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let service = InventoryService::in_memory();
        let out = run_script(&service, "");
        assert!(out.contains("Exiting..."));

        let out = run_script(&service, "1\nA1\n");
        assert!(out.contains("Exiting..."));
        assert!(service.list_products().is_empty());
    }
}
