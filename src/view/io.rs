use std::io::{BufRead, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::FlooringError;
use crate::io::directory::is_partitionable;
use crate::model::money::SCALE;

pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Line-oriented console access. Implementors supply `print` and
/// `read_line`; the typed readers re-prompt until the input parses.
///
/// End of input surfaces as [`FlooringError::InputClosed`].
pub trait UserIo {
    fn print(&mut self, msg: &str) -> Result<(), FlooringError>;

    /// Prints `prompt` and returns the next line without its terminator,
    /// or `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, FlooringError>;

    fn read_string(&mut self, prompt: &str) -> Result<String, FlooringError> {
        self.read_line(prompt)?.ok_or(FlooringError::InputClosed)
    }

    fn read_int(&mut self, prompt: &str, min: u32, max: u32) -> Result<u32, FlooringError> {
        loop {
            let raw = self.read_string(prompt)?;
            match raw.trim().parse::<u32>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => self.print(&format!("Enter a whole number from {} to {}.", min, max))?,
            }
        }
    }

    fn read_date(
        &mut self,
        prompt: &str,
        min: Option<NaiveDate>,
    ) -> Result<NaiveDate, FlooringError> {
        loop {
            let raw = self.read_string(prompt)?;
            match parse_date(&raw) {
                Some(date) if min.is_none_or(|m| date >= m) => return Ok(date),
                Some(_) => self.print("That date is too early.")?,
                None => self.print("Dates are written MM/DD/YYYY.")?,
            }
        }
    }

    fn read_decimal(&mut self, prompt: &str, min: Decimal) -> Result<Decimal, FlooringError> {
        loop {
            let raw = self.read_string(prompt)?;
            match parse_amount(&raw) {
                Some(value) if value >= min => return Ok(value),
                _ => self.print(&format!(
                    "Enter a value in XXXX.XX format, at least {}.",
                    min
                ))?,
            }
        }
    }

    fn read_yes_no(&mut self, prompt: &str) -> Result<bool, FlooringError> {
        loop {
            let raw = self.read_string(&format!("{} (y/n)", prompt))?;
            match raw.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.print("Answer y or n.")?,
            }
        }
    }
}

/// Parses `MM/DD/YYYY`. Years that cannot name an order file are refused.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| is_partitionable(*date))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses an amount written with exactly two decimal places.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let (_, fraction) = raw.split_once('.')?;
    if fraction.len() != SCALE as usize || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<Decimal>().ok().filter(|d| d.scale() == SCALE)
}

/// [`UserIo`] over any buffered reader and writer.
pub struct ConsoleIo<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> UserIo for ConsoleIo<R, W> {
    fn print(&mut self, msg: &str) -> Result<(), FlooringError> {
        writeln!(self.output, "{}", msg)?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, FlooringError> {
        writeln!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
