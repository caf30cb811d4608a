use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;
use log::{error, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use crate::export::save_records;
use crate::status::Status;
use crate::tracker::Tracker;

const HELP: &str = "\
commands:
  list                      show all addresses
  summary                   count addresses per status
  markers                   show addresses with map positions
  status <row> <status>     set status by label or number (1-5)
  note <row> [text]         set note, empty text clears it
  save                      write the table to the output file
  help                      show this text
  quit                      end the session";

/// A parsed input line. Rows are 1-based, as shown by `list`.
#[derive(Debug, PartialEq)]
pub enum Command {
    List,
    Summary,
    Markers,
    SetStatus { row: usize, status: Status },
    SetNote { row: usize, note: String },
    Save,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match name.to_lowercase().as_str() {
            "list" => Ok(Command::List),
            "summary" => Ok(Command::Summary),
            "markers" => Ok(Command::Markers),
            "save" => Ok(Command::Save),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "status" => {
                let (row, status) = rest.split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: status <row> <status>".to_string())?;
                Ok(Command::SetStatus {
                    row: parse_row(row)?,
                    status: status.parse().map_err(|s| format!("unknown status [{}]", s))?,
                })
            }
            "note" => {
                let (row, note) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Command::SetNote {
                    row: parse_row(row)?,
                    note: note.trim().to_string(),
                })
            }
            _ => Err(format!("unknown command [{}], try `help`", name)),
        }
    }
}

fn parse_row(value: &str) -> Result<usize, String> {
    value.trim().parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .ok_or_else(|| format!("invalid row [{}]", value))
}

/// Terminal stand-in for the table view: edits the tracker line by line.
pub struct Session {
    tracker: Tracker,
    output: PathBuf,
}

impl Session {
    pub fn new(tracker: Tracker, output: impl Into<PathBuf>) -> Self {
        Self {
            tracker,
            output: output.into(),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Read commands until `quit` or end of input, printing every reply.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> color_eyre::Result<()> {
        println!("{}", HELP);
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => println!("{}", self.execute(command)),
                Err(msg) => println!("{}", msg),
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> String {
        match command {
            Command::List => self.table(),
            Command::Summary => self.summary(),
            Command::Markers => self.markers(),
            Command::SetStatus { row, status } => {
                let changed = row.checked_sub(1)
                    .is_some_and(|idx| self.tracker.set_status(idx, status));
                if changed {
                    format!("row {} is now [{}]", row, status)
                } else {
                    self.no_such_row(row)
                }
            }
            Command::SetNote { row, note } => {
                let changed = row.checked_sub(1)
                    .is_some_and(|idx| self.tracker.set_note(idx, note));
                if changed {
                    format!("note of row {} updated", row)
                } else {
                    self.no_such_row(row)
                }
            }
            Command::Save => match save_records(self.tracker.records(), &self.output) {
                Ok(()) => {
                    info!("saved [{}] records to [{}]", self.tracker.records().len(), self.output.display());
                    format!("saved to {}", self.output.display())
                }
                Err(e) => {
                    error!("cannot save records: {:?}", e);
                    format!("cannot save to {}: {}", self.output.display(), e)
                }
            },
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        }
    }

    fn no_such_row(&self, row: usize) -> String {
        format!("no row {}, the table has {} rows", row, self.tracker.records().len())
    }

    fn table(&self) -> String {
        if self.tracker.records().is_empty() {
            return "no addresses loaded".to_string();
        }
        let mut out = String::new();
        for (idx, record) in self.tracker.records().iter().enumerate() {
            let _ = write!(out, "{:>3}  {:<45} {:<18}", idx + 1, record.formatted(), record.status);
            if !record.note.is_empty() {
                let _ = write!(out, " {}", record.note);
            }
            out.push('\n');
        }
        out.pop();
        out
    }

    fn summary(&self) -> String {
        self.tracker.summarize()
            .iter()
            .map(|entry| format!("{:>4}  {}", entry.count, entry.status))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn markers(&self) -> String {
        let markers = self.tracker.markers();
        if markers.is_empty() {
            let center = self.tracker.map_center();
            return format!("no positions, map centered at {:.4}, {:.4}", center.lat, center.lng);
        }
        markers.iter()
            .map(|marker| format!(
                "{:>3}  {:.5}, {:.5}  {}  {}",
                marker.row + 1,
                marker.position.lat,
                marker.position.lng,
                marker.color,
                marker.popup.replace('\n', " | "),
            ))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
