use std::{collections::VecDeque, io::BufRead, str::FromStr};

use super::error::InputError;
use super::vec2::Vec2;
use super::world::{PodSnapshot, Track, World};

/// Whitespace-separated tokens across line boundaries.
pub struct TokenReader<R> {
    inner: R,
    pending: VecDeque<String>,
    line: String,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        TokenReader {
            inner,
            pending: VecDeque::new(),
            line: String::new(),
        }
    }

    /// Next raw token, `None` once input is exhausted.
    fn token(&mut self) -> Result<Option<String>, InputError> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.inner.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(self.line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    pub fn next<T: FromStr>(&mut self, expected: &'static str) -> Result<T, InputError> {
        let token = self
            .token()?
            .ok_or(InputError::UnexpectedEof { expected })?;
        token
            .parse()
            .map_err(|_| InputError::Parse { expected, token })
    }

    /// Like [`next`](Self::next) but a clean end of input yields `None`.
    pub fn next_or_eof<T: FromStr>(&mut self, expected: &'static str) -> Result<Option<T>, InputError> {
        match self.token()? {
            None => Ok(None),
            Some(token) => token
                .parse()
                .map(Some)
                .map_err(|_| InputError::Parse { expected, token }),
        }
    }
}

/// Header: lap count, checkpoint count, then `x y` per checkpoint.
pub fn read_track<R: BufRead>(reader: &mut TokenReader<R>, radius: f64) -> Result<Track, InputError> {
    let laps: u32 = reader.next("lap count")?;
    let count: usize = reader.next("checkpoint count")?;
    if count > Track::MAX_CHECKPOINTS {
        return Err(InputError::Track(format!(
            "{count} checkpoints, at most {} supported",
            Track::MAX_CHECKPOINTS
        )));
    }

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x: i32 = reader.next("checkpoint x")?;
        let y: i32 = reader.next("checkpoint y")?;
        points.push(Vec2::new(x as f64, y as f64));
    }

    Track::new(laps, &points, radius)
}

fn read_pod<R: BufRead>(reader: &mut TokenReader<R>, first: Option<i32>) -> Result<PodSnapshot, InputError> {
    let x = match first {
        Some(x) => x,
        None => reader.next("pod x")?,
    };
    let y: i32 = reader.next("pod y")?;
    let vx: i32 = reader.next("pod vx")?;
    let vy: i32 = reader.next("pod vy")?;
    let angle: i32 = reader.next("pod angle")?;
    let next: usize = reader.next("next checkpoint")?;

    Ok(PodSnapshot {
        pos: Vec2::new(x as f64, y as f64),
        vel: Vec2::new(vx as f64, vy as f64),
        angle: angle as f64,
        next_checkpoint: next,
    })
}

/// Reads one turn into `world`. Returns `false` when input ended cleanly
/// before the turn started; ending anywhere inside a turn is an error.
pub fn read_turn<R: BufRead>(reader: &mut TokenReader<R>, world: &mut World) -> Result<bool, InputError> {
    let Some(first) = reader.next_or_eof::<i32>("pod x")? else {
        return Ok(false);
    };

    let mut mine = Vec::with_capacity(world.mine.len());
    for i in 0..world.mine.len() {
        mine.push(read_pod(reader, (i == 0).then_some(first))?);
    }

    let mut opponents = Vec::with_capacity(world.opponents.len());
    for _ in 0..world.opponents.len() {
        opponents.push(read_pod(reader, None)?);
    }

    world.observe(&mine, &opponents);
    Ok(true)
}
