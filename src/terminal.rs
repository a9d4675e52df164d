use anyhow::{bail, Context};
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::assessment::{SubmissionPayload, TextField};
use crate::client::{ResultView, SubmissionClient};

/// Questions in the order the form lays them out.
pub const QUESTIONS: [(TextField, &str); 13] = [
    (TextField::Username, "Username"),
    (TextField::Password, "Password"),
    (TextField::Gender, "Gender"),
    (TextField::Age, "Age"),
    (TextField::Description, "Describe yourself in a few words"),
    (TextField::Lifestyle, "What does a normal day look like for you?"),
    (TextField::Lately, "How have you been feeling lately?"),
    (TextField::Mood, "How would you describe your mood?"),
    (TextField::Reflection, "What have you been thinking about most?"),
    (TextField::StressCauses, "What causes you stress?"),
    (TextField::Handling, "How do you usually handle it?"),
    (TextField::Worries, "What worries you right now?"),
    (TextField::Extra, "Anything else you want to add?"),
];

pub const CONSENT_QUESTION: &str = "Do you consent to your answers being analysed? (y/n)";

pub struct Questionnaire;

impl Questionnaire {
    /// Asks every question once. Answers are taken verbatim, empty ones
    /// included; end of input answers the remaining questions with "".
    pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<SubmissionPayload> {
        let mut payload = SubmissionPayload::default();

        for (field, question) in QUESTIONS.iter() {
            *payload.text_mut(*field) = ask(input, output, question)?;
        }

        let consent = ask(input, output, CONSENT_QUESTION)?;
        payload.consent = matches!(consent.trim().to_ascii_lowercase().as_str(), "y" | "yes");

        Ok(payload)
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{}: ", question)?;
    output.flush()?;
    read_line(input)
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Prints the result panel to stdout and alerts to stderr.
#[derive(Default)]
pub struct TerminalView;

impl ResultView for TerminalView {
    fn set_loading(&self, visible: bool) {
        if visible {
            println!("⏳ Analysing your answers...");
        }
    }

    fn set_result_visible(&self, visible: bool) {
        if visible {
            println!("\n=== Your Result ===");
        }
    }

    fn render(&self, stress_level: &str, confidence: &str, generated_at: &str) {
        println!("{}", stress_level);
        println!("{}", confidence);
        println!("{}", generated_at);
        println!();
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit,
    Report,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim().to_ascii_lowercase();
        Some(match word.as_str() {
            "" => return None,
            "submit" | "s" => Command::Submit,
            "pdf" | "report" | "download" => Command::Report,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(word),
        })
    }
}

const HELP: &str = "Commands:
  submit   fill in the questionnaire and get your stress assessment
  pdf      download the last assessment as a PDF report
  status   check that the backend is reachable
  help     show this message
  quit     leave";

/// Interactive loop over any line source. The client's latest-result slot
/// lives as long as the session does.
pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn run(&mut self, client: &SubmissionClient) -> anyhow::Result<()> {
        writeln!(self.output, "Stress Check - type `help` for commands")?;

        loop {
            write!(self.output, "stress-check> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                debug!("Input closed, leaving session");
                break;
            }

            let command = match Command::parse(&line) {
                Some(command) => command,
                None => continue,
            };

            match command {
                Command::Submit => {
                    let payload = Questionnaire::prompt(&mut self.input, &mut self.output)?;
                    // Failures were already shown to the user.
                    let _ = client.submit(&payload).await;
                }
                Command::Report => {
                    let _ = client.download_report().await;
                }
                Command::Status => match client.backend().health().await {
                    Ok(message) => writeln!(self.output, "✅ Backend: {}", message)?,
                    Err(e) => writeln!(self.output, "❌ Backend unreachable: {}", e)?,
                },
                Command::Help => writeln!(self.output, "{}", HELP)?,
                Command::Quit => break,
                Command::Unknown(word) => {
                    writeln!(self.output, "Unknown command `{}`. Type `help`.", word)?
                }
            }
        }

        info!("Session ended");
        Ok(())
    }
}

/// Command-line options of the `stress-check` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub form: Option<PathBuf>,
    pub report: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--form" | "-f" => {
                    let path = args.next().context("--form needs a file path")?;
                    parsed.form = Some(PathBuf::from(path));
                }
                "--pdf" => parsed.report = true,
                "--help" | "-h" => parsed.help = true,
                other => bail!("Unknown argument: {}", other),
            }
        }

        if parsed.report && parsed.form.is_none() {
            bail!("--pdf needs --form: there is no result to render without a submission");
        }

        Ok(parsed)
    }

    pub fn usage() -> &'static str {
        "Usage: stress-check [--form <answers.json> [--pdf]]

Without arguments an interactive session starts.
  --form <file>  submit the answers stored in a JSON file
  --pdf          also download the report after submitting"
    }
}
