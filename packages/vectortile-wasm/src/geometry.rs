//! Geometry command stream decoding.
//!
//! A feature's geometry is a packed list of varints: a command word
//! (`id = word & 0x7`, `count = word >> 3`) followed by `count` zig-zag
//! encoded coordinate deltas for MoveTo/LineTo, or nothing for ClosePath.

use serde::Serialize;

use crate::error::{DecodeError, Result};
use crate::pbf::Pbf;

const CMD_MOVE_TO: u32 = 1;
const CMD_LINE_TO: u32 = 2;
const CMD_CLOSE_PATH: u32 = 7;

/// Tile-local integer coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Bounding box as `[min_x, min_y, max_x, max_y]`.
pub type BBox = [i32; 4];

/// Bounding box of a geometry with no points.
pub const EMPTY_BBOX: BBox = [i32::MAX, i32::MAX, i32::MIN, i32::MIN];

/// A decoded drawing instruction with the cursor already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
}

/// Iterator over the commands of one geometry field.
///
/// Each instance owns its reader, so decoding the same feature twice never
/// shares state between the two passes.
#[derive(Debug, Clone)]
pub struct Commands<'a> {
    pbf: Pbf<'a>,
    end: usize,
    cmd: u32,
    remaining: u32,
    cursor: Point,
    failed: bool,
}

impl<'a> Commands<'a> {
    /// Starts at `offset`, which points at the geometry field's length prefix.
    pub fn new(buf: &'a [u8], offset: usize) -> Result<Self> {
        let mut pbf = Pbf::at(buf, offset);
        let end = pbf.read_length_end()?;
        Ok(Self::bounded(pbf, end))
    }

    /// A stream with no commands, for features without a geometry field.
    pub fn empty() -> Self {
        Self::bounded(Pbf::new(&[]), 0)
    }

    fn bounded(pbf: Pbf<'a>, end: usize) -> Self {
        Commands {
            pbf,
            end,
            cmd: CMD_MOVE_TO,
            remaining: 0,
            cursor: Point::default(),
            failed: false,
        }
    }

    /// Current byte position of the underlying reader.
    pub fn position(&self) -> usize {
        self.pbf.position()
    }

    fn step(&mut self) -> Result<Command> {
        if self.remaining == 0 {
            let word = self.pbf.read_varint()? as u32;
            self.cmd = word & 0x7;
            self.remaining = word >> 3;
        }
        // A zero count still runs the command once.
        self.remaining = self.remaining.saturating_sub(1);

        match self.cmd {
            CMD_MOVE_TO | CMD_LINE_TO => {
                let dx = self.pbf.read_svarint()? as i32;
                let dy = self.pbf.read_svarint()? as i32;
                self.cursor.x = self.cursor.x.wrapping_add(dx);
                self.cursor.y = self.cursor.y.wrapping_add(dy);
                if self.cmd == CMD_MOVE_TO {
                    Ok(Command::MoveTo(self.cursor))
                } else {
                    Ok(Command::LineTo(self.cursor))
                }
            }
            CMD_CLOSE_PATH => Ok(Command::ClosePath),
            other => Err(DecodeError::UnknownCommand(other)),
        }
    }
}

impl Iterator for Commands<'_> {
    type Item = Result<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pbf.position() >= self.end {
            return None;
        }
        let step = self.step();
        self.failed = step.is_err();
        Some(step)
    }
}

/// Collects the command stream into lines (or rings).
///
/// Every MoveTo starts a new line. ClosePath appends a copy of the line's
/// first point; a line left open at the end of the stream is kept as is.
pub fn load_geometry(commands: &mut Commands) -> Result<Vec<Vec<Point>>> {
    let mut lines = Vec::new();
    let mut line: Option<Vec<Point>> = None;

    for command in commands {
        match command? {
            Command::MoveTo(p) => {
                if let Some(done) = line.replace(vec![p]) {
                    lines.push(done);
                }
            }
            Command::LineTo(p) => line.get_or_insert_with(Vec::new).push(p),
            Command::ClosePath => {
                if let Some(current) = line.as_mut() {
                    if let Some(&first) = current.first() {
                        current.push(first);
                    }
                }
            }
        }
    }

    if let Some(done) = line {
        lines.push(done);
    }
    Ok(lines)
}

/// Bounding box over the same command stream, without building lines.
pub fn bbox(commands: &mut Commands) -> Result<BBox> {
    let mut b = EMPTY_BBOX;
    for command in commands {
        if let Command::MoveTo(p) | Command::LineTo(p) = command? {
            b[0] = b[0].min(p.x);
            b[1] = b[1].min(p.y);
            b[2] = b[2].max(p.x);
            b[3] = b[3].max(p.y);
        }
    }
    Ok(b)
}
