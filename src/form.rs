//! Interactive terminal form collecting car attributes

use crate::config::FormConfig;
use crate::types::car::{CarInput, CONDITIONS, FUEL_TYPES, TRANSMISSIONS};
use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Prompts for each field on `writer` and reads answers from `reader`.
pub struct PriceForm<'a, R, W> {
    reader: R,
    writer: W,
    config: &'a FormConfig,
}

impl<'a, R: BufRead, W: Write> PriceForm<'a, R, W> {
    pub fn new(reader: R, writer: W, config: &'a FormConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Run the form. Returns `None` if input ends before it is complete.
    pub fn collect(&mut self) -> Result<Option<CarInput>> {
        let config = self.config;
        let defaults = CarInput::default();
        let bounds = &config.bounds;
        let brands: Vec<&str> = config.brands.iter().map(String::as_str).collect();

        let Some(brand) = self.choose("Brand", &brands, None)? else {
            return Ok(None);
        };
        let Some(model_name) = self.text("Model (e.g. Avanza, Civic)")? else {
            return Ok(None);
        };
        let Some(year) = self.number(
            "Production year",
            bounds.year_min,
            bounds.year_max,
            defaults.year,
        )?
        else {
            return Ok(None);
        };
        let Some(mileage) = self.number(
            "Mileage (km)",
            bounds.mileage_min,
            bounds.mileage_max,
            defaults.mileage,
        )?
        else {
            return Ok(None);
        };
        let Some(transmission) = self.choose("Transmission", TRANSMISSIONS, Some(0))? else {
            return Ok(None);
        };
        let Some(fuel) = self.choose("Fuel", FUEL_TYPES, Some(0))? else {
            return Ok(None);
        };
        let Some(engine_size_cc) = self.number(
            "Engine size (cc)",
            bounds.engine_size_min,
            bounds.engine_size_max,
            defaults.engine_size_cc,
        )?
        else {
            return Ok(None);
        };
        let Some(condition) = self.choose("Condition", CONDITIONS, Some(0))? else {
            return Ok(None);
        };

        Ok(Some(CarInput {
            brand,
            model_name,
            year,
            mileage,
            transmission,
            fuel,
            engine_size_cc,
            condition,
        }))
    }

    /// Read one trimmed line, `None` at end of input
    fn read_answer(&mut self) -> Result<Option<String>> {
        self.writer.flush().context("Failed to flush prompt")?;
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Enumerated choice by number or case-insensitive text.
    ///
    /// An empty answer takes `default`, or an empty string when there is none.
    fn choose(&mut self, label: &str, options: &[&str], default: Option<usize>) -> Result<Option<String>> {
        writeln!(self.writer, "{}:", label)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}) {}", i + 1, option)?;
        }

        loop {
            match default {
                Some(d) => write!(self.writer, "Choose [{}]: ", options[d])?,
                None => write!(self.writer, "Choose: ")?,
            }

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            if answer.is_empty() {
                return Ok(Some(default.map(|d| options[d].to_string()).unwrap_or_default()));
            }

            if let Ok(n) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(Some(options[n - 1].to_string()));
                }
            }

            if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(&answer)) {
                return Ok(Some(option.to_string()));
            }

            writeln!(self.writer, "Please pick 1-{} or type one of the options.", options.len())?;
        }
    }

    fn text(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.writer, "{}: ", label)?;
        self.read_answer()
    }

    /// Bounded integer, re-prompting until it parses and is in range
    fn number<T>(&mut self, label: &str, min: T, max: T, default: T) -> Result<Option<T>>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        loop {
            write!(self.writer, "{} ({}-{}) [{}]: ", label, min, max, default)?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            if answer.is_empty() {
                return Ok(Some(default));
            }

            match answer.parse::<T>() {
                Ok(value) if value >= min && value <= max => return Ok(Some(value)),
                _ => writeln!(self.writer, "Enter a whole number between {} and {}.", min, max)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(answers: &str) -> (Option<CarInput>, String) {
        let config = FormConfig::default();
        let mut output = Vec::new();
        let result = PriceForm::new(Cursor::new(answers.as_bytes()), &mut output, &config)
            .collect()
            .unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_full_form() {
        let (input, _) = run("1\nAvanza\n2018\n50000\nmanual\n2\n1300\nGood\n");
        let input = input.unwrap();

        assert_eq!(input.brand, "Toyota");
        assert_eq!(input.model_name, "Avanza");
        assert_eq!(input.year, 2018);
        assert_eq!(input.mileage, 50_000);
        assert_eq!(input.transmission, "Manual");
        assert_eq!(input.fuel, "Diesel");
        assert_eq!(input.engine_size_cc, 1300);
        assert_eq!(input.condition, "Good");
    }

    #[test]
    fn test_defaults_on_empty_answers() {
        let (input, _) = run("honda\nCivic\n\n\n\n\n\n\n");
        let input = input.unwrap();

        assert_eq!(input.brand, "Honda");
        assert_eq!(input.year, 2015);
        assert_eq!(input.mileage, 50_000);
        assert_eq!(input.transmission, "Automatic");
        assert_eq!(input.fuel, "Petrol");
        assert_eq!(input.engine_size_cc, 1500);
        assert_eq!(input.condition, "Excellent");
    }

    #[test]
    fn test_reprompts_on_invalid_answers() {
        let (input, output) = run("9\nTesla\nBMW\nX5\n1980\nabc\n2020\n\n\n\n\n\n");
        let input = input.unwrap();

        assert_eq!(input.brand, "BMW");
        assert_eq!(input.year, 2020);
        assert_eq!(output.matches("Please pick 1-8").count(), 2);
        assert_eq!(output.matches("Enter a whole number between 1990 and 2023").count(), 2);
    }

    #[test]
    fn test_blank_brand_is_left_empty() {
        let (input, _) = run("\nAvanza\n\n\n\n\n\n\n");
        assert_eq!(input.unwrap().brand, "");
    }

    #[test]
    fn test_end_of_input_aborts() {
        let (input, _) = run("1\nAvanza\n");
        assert!(input.is_none());
    }
}
