//! Interactive driver: prompt for a target, probe it, print the guess

use crate::output::{OutputManager, ProbeReport};
use crate::probe::TtlProber;
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter IP: ";
pub const NO_TARGET: &str = "No IP entered. Exiting.";
pub const PAUSE_PROMPT: &str = "Press any key to exit...";

/// Interactive session over arbitrary input/output streams
pub struct InteractiveDriver<'a> {
    prober: &'a TtlProber,
    output: &'a OutputManager,
    pause: bool,
}

impl<'a> InteractiveDriver<'a> {
    pub fn new(prober: &'a TtlProber, output: &'a OutputManager) -> Self {
        Self {
            prober,
            output,
            pause: true,
        }
    }

    /// Wait for a final line of input before returning
    pub fn with_pause(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    /// Run one prompt/probe/print cycle
    ///
    /// Returns the report, or `None` when no target was entered.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> io::Result<Option<ProbeReport>> {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let target = line.trim();

        if target.is_empty() {
            writeln!(out, "{}", NO_TARGET)?;
            return Ok(None);
        }

        log::info!("Probing {}", target);
        let report = ProbeReport::new(target, self.prober.probe(target));
        self.output.write_reports(out, std::slice::from_ref(&report))?;

        if self.pause {
            write!(out, "{}", PAUSE_PROMPT)?;
            out.flush()?;
            let mut ack = String::new();
            input.read_line(&mut ack)?;
        }

        Ok(Some(report))
    }
}
