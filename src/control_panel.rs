use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::ControlPanelError;

pub const ACTIVE_MARK: &str = "✅";
pub const EMPTY_MARK: &str = "  ";
pub const ON_FLAG: &str = "---on";

/// One line of the control panel file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub active: bool,
    pub on: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
            on: false,
        }
    }

    pub fn parse(line: &str) -> Self {
        let stripped = line.trim_start();
        let (active, remainder) = match stripped.strip_prefix(ACTIVE_MARK) {
            Some(rest) => (true, rest.trim_start()),
            None => (false, stripped),
        };

        match remainder.find(ON_FLAG) {
            Some(position) => {
                let raw_before = &remainder[..position];
                let raw_after = &remainder[position + ON_FLAG.len()..];
                let before = raw_before.trim_end();
                let after = raw_after.trim_start();
                let spaced = before.len() != raw_before.len() || after.len() != raw_after.len();
                let name = if spaced && !before.is_empty() && !after.is_empty() {
                    format!("{before} {after}")
                } else {
                    format!("{before}{after}")
                };
                Self {
                    name: name.trim().to_string(),
                    active,
                    on: true,
                }
            }
            None => Self {
                name: remainder.trim().to_string(),
                active,
                on: false,
            },
        }
    }

    /// Persisted form; inactive entries carry no marker at all.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        if self.active {
            line.push_str(ACTIVE_MARK);
            line.push(' ');
        }
        line.push_str(&self.name);
        if self.on {
            line.push(' ');
            line.push_str(ON_FLAG);
        }
        line
    }

    /// Console form; inactive entries get a blank placeholder as wide as the mark.
    pub fn display_line(&self) -> String {
        let mark = if self.active { ACTIVE_MARK } else { EMPTY_MARK };
        if self.on {
            format!("{mark} {} {ON_FLAG}", self.name)
        } else {
            format!("{mark} {}", self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPanel {
    entries: Vec<Entry>,
}

impl ControlPanel {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = lines
            .into_iter()
            .map(|line| Entry::parse(line.as_ref()))
            .filter(|entry| {
                if entry.name.is_empty() {
                    log::warn!("[control_panel] skipping line without a filename");
                }
                !entry.name.is_empty()
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Makes `filename` the single active entry, appending it when missing.
    /// With `switch_on` the on-flag moves to it as well; otherwise existing
    /// flags are kept.
    pub fn activate(self, filename: &str, switch_on: bool) -> Result<Self, ControlPanelError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(ControlPanelError::EmptyFilename);
        }
        if filename.contains(['\n', '\r']) {
            return Err(ControlPanelError::InvalidFilename(filename.to_string()));
        }

        let known = self.contains(filename);
        let mut entries = self.entries;
        if !known {
            log::info!("[control_panel] adding new entry {filename}");
            entries.push(Entry::new(filename));
        }

        for entry in &mut entries {
            let selected = entry.name == filename;
            entry.active = selected;
            if switch_on {
                entry.on = selected;
            }
        }

        Ok(Self { entries })
    }

    pub fn to_file_content(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}\n", entry.to_line()))
            .collect()
    }
}

/// The on-disk control panel. Every operation is load, transform, persist.
pub struct ControlPanelFile {
    path: PathBuf,
}

impl ControlPanelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Raw non-blank lines with trailing whitespace removed. A missing file is
    /// an empty panel.
    pub fn load(&self) -> io::Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "[control_panel] no state file at {}, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(error) => return Err(error),
        };

        let lines: Vec<String> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_end().to_string())
            .collect();
        log::debug!(
            "[control_panel] loaded {} entries from {}",
            lines.len(),
            self.path.display()
        );
        Ok(lines)
    }

    pub fn load_panel(&self) -> io::Result<ControlPanel> {
        Ok(ControlPanel::from_lines(self.load()?))
    }

    /// Rewrites the whole file. Not transactional.
    pub fn save(&self, panel: &ControlPanel) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, panel.to_file_content())?;
        log::info!(
            "[control_panel] wrote {} entries to {}",
            panel.entries().len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn show(&self, out: &mut impl Write) -> Result<(), ControlPanelError> {
        let panel = self.load_panel()?;
        if panel.is_empty() {
            writeln!(out, "No entries in {}", self.file_name())?;
            return Ok(());
        }
        for entry in panel.entries() {
            writeln!(out, "{}", entry.display_line())?;
        }
        Ok(())
    }

    pub fn activate(
        &self,
        filename: &str,
        switch_on: bool,
        out: &mut impl Write,
    ) -> Result<ControlPanel, ControlPanelError> {
        let panel = self.load_panel()?.activate(filename, switch_on)?;
        self.save(&panel)?;

        let name = filename.trim();
        if switch_on {
            writeln!(out, "Activated: {ACTIVE_MARK} {name} {ON_FLAG}")?;
        } else {
            writeln!(out, "Activated: {ACTIVE_MARK} {name}")?;
        }
        self.show(out)?;
        Ok(panel)
    }

    pub fn switch(&self, filename: &str, out: &mut impl Write) -> Result<ControlPanel, ControlPanelError> {
        self.activate(filename, true, out)
    }
}
