//! Line-oriented console session.
//!
//! Each input line is one UI event for the [`GalleryApp`]:
//!
//! | Line | Event |
//! |---|---|
//! | `submit <text>` or bare text | set the input and submit it |
//! | `drop <path>...` | drop files (directories contribute their files) |
//! | `drag enter\|over\|leave` | drag gesture |
//! | `clear` | reset gallery, input and error |
//! | `resize <width>` | viewport resize notification |
//! | `wait` | block until ingestion is idle and swaps are done |
//! | `show` / `status` | print tiles / session state |
//! | `render <file>` | write the current gallery as HTML |
//! | `help` / `quit` | |
//!
//! After every line, finished work is applied and ingestion events are
//! printed. Empty lines and lines starting with `#` are ignored.

use crate::app::GalleryApp;
use crate::ingest::{IngestEvent, load_dropped_files};
use crate::output::{format_gallery, format_ingest_event, format_status};
use crate::render::write_page;
use crate::viewport::ResizeBus;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;
use thiserror::Error;

const HELP: &str = "\
Commands:
    submit <text>        Submit an image URL, manifest URL (*.json) or path
    <text>               Same as submit
    drop <path>...       Drop files; directories contribute their files
    drag enter|over|leave
    clear                Remove all images, the input and the error
    resize <width>       Change the viewport width
    wait                 Wait for pending work and image swaps
    show                 List gallery tiles
    status               Show input, hint and error
    render <file>        Write the gallery as an HTML page
    help                 Show this help
    quit                 Leave the session";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid width '{0}'")]
    Width(String),
    #[error("Unknown drag gesture '{0}' (expected enter, over or leave)")]
    Drag(String),
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    Enter,
    Over,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Drop(Vec<PathBuf>),
    Drag(DragGesture),
    Clear,
    Resize(u32),
    Wait,
    Show,
    Status,
    Render(PathBuf),
    Help,
    Quit,
    Nothing,
}

/// Parse one console line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Command::Nothing);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "submit" => Command::Submit(rest.to_string()),
        "drop" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("drop <path>..."));
            }
            Command::Drop(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "drag" => match rest {
            "enter" => Command::Drag(DragGesture::Enter),
            "over" => Command::Drag(DragGesture::Over),
            "leave" => Command::Drag(DragGesture::Leave),
            "" => return Err(CommandError::Usage("drag enter|over|leave")),
            other => return Err(CommandError::Drag(other.to_string())),
        },
        "resize" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("resize <width>"));
            }
            match rest.parse::<u32>() {
                Ok(width) if width > 0 => Command::Resize(width),
                _ => return Err(CommandError::Width(rest.to_string())),
            }
        }
        "render" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("render <file>"));
            }
            Command::Render(PathBuf::from(rest))
        }
        "clear" if rest.is_empty() => Command::Clear,
        "wait" if rest.is_empty() => Command::Wait,
        "show" if rest.is_empty() => Command::Show,
        "status" if rest.is_empty() => Command::Status,
        "help" if rest.is_empty() => Command::Help,
        "quit" | "exit" if rest.is_empty() => Command::Quit,
        _ => Command::Submit(line.to_string()),
    };
    Ok(command)
}

/// An interactive session driving one mounted app.
pub struct Console<'a> {
    app: &'a mut GalleryApp,
    bus: &'a ResizeBus,
    events: Receiver<IngestEvent>,
    prompt: bool,
}

impl<'a> Console<'a> {
    pub fn new(app: &'a mut GalleryApp, bus: &'a ResizeBus, events: Receiver<IngestEvent>) -> Self {
        Self {
            app,
            bus,
            events,
            prompt: false,
        }
    }

    /// Print a `> ` prompt before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), ConsoleError> {
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command, out)?,
                Err(e) => writeln!(out, "{}", e)?,
            }
            self.refresh(out)?;
        }
        // Let in-flight work land so its outcome is reported.
        self.app.settle();
        self.refresh(out)?;
        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        match command {
            Command::Submit(text) => self.app.submit_value(text),
            Command::Drop(paths) => match load_dropped_files(&paths) {
                Ok(files) => self.app.handle_drop(files),
                Err(e) => writeln!(out, "Could not read dropped files: {}", e)?,
            },
            Command::Drag(DragGesture::Enter) => self.app.drag_enter(),
            Command::Drag(DragGesture::Over) => self.app.drag_over(),
            Command::Drag(DragGesture::Leave) => self.app.drag_leave(),
            Command::Clear => self.app.clear(),
            Command::Resize(width) => self.bus.notify(width),
            Command::Wait => self.app.settle(),
            Command::Show => {
                let lines = format_gallery(&self.app.view(), self.app.viewport_width());
                write_lines(out, &lines)?;
            }
            Command::Status => {
                let controller = self.app.controller();
                let lines = format_status(
                    controller.session(),
                    controller.in_flight(),
                    self.app.gallery().len(),
                    self.app.viewport_width(),
                );
                write_lines(out, &lines)?;
            }
            Command::Render(path) => {
                let options = self.app.page_options();
                match write_page(&path, self.app.gallery().records(), &options) {
                    Ok(()) => writeln!(out, "Wrote {}", path.display())?,
                    Err(e) => writeln!(out, "Could not write {}: {}", path.display(), e)?,
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit | Command::Nothing => {}
        }
        Ok(())
    }

    /// Apply finished work and print the events it produced.
    fn refresh<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let now = Instant::now();
        self.app.pump(now);
        self.app.placeholders_loaded(now);
        for event in self.events.try_iter() {
            write_lines(out, &format_ingest_event(&event))?;
        }
        Ok(())
    }
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
