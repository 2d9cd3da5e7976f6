//! Readers for the MovingAI benchmark `.scen` and `.map` formats.

use std::fs::File;
use std::io::{BufRead, BufReader, Error, Lines, Result};
use std::path::{Path, PathBuf};

/// Cost byte written for cells the agent can never enter.
pub const LETHAL: u8 = 255;

pub struct Problem {
    pub start: (i32, i32),
    pub goal: (i32, i32),
    pub optimal: f64,
}

pub struct Scenario {
    pub map: PathBuf,
    pub width: i32,
    pub height: i32,
    pub problems: Vec<Problem>,
}

/// Row-major cost bytes for a whole map.
pub struct CostGrid {
    pub width: i32,
    pub height: i32,
    pub costs: Vec<u8>,
}

impl CostGrid {
    pub fn index(&self, (x, y): (i32, i32)) -> usize {
        (y * self.width + x) as usize
    }
}

pub fn read_scenario(scen_path: &Path) -> Result<Scenario> {
    let mut lines = BufReader::new(File::open(scen_path)?).lines();
    let (version, number) = pair(lines.next().transpose()?.as_deref())?;
    if version != "version" || !matches!(number.as_str(), "1" | "1.0") {
        return Err(Error::other(format!("unsupported scenario header {version} {number}")));
    }

    let mut header: Option<(String, i32, i32)> = None;
    let mut problems = vec![];

    for line in lines {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let [_bucket, map, w, h, sx, sy, gx, gy, optimal] = tokens[..] else {
            return Err(Error::other(format!("malformed problem instance: {line}")));
        };
        let int = |tok: &str| tok.parse::<i32>().map_err(Error::other);
        let (width, height) = (int(w)?, int(h)?);

        match &header {
            Some((first_map, first_w, first_h)) => {
                if first_map != map || (*first_w, *first_h) != (width, height) {
                    return Err(Error::other("problem instances disagree on the map"));
                }
            }
            None => header = Some((map.to_owned(), width, height)),
        }

        problems.push(Problem {
            start: (int(sx)?, int(sy)?),
            goal: (int(gx)?, int(gy)?),
            optimal: optimal.parse().map_err(Error::other)?,
        });
    }

    let Some((map, width, height)) = header else {
        return Err(Error::other("scenario has no problem instances"));
    };
    let beside_scen = scen_path.parent().map(|dir| dir.join(&map));
    let map = match beside_scen {
        Some(path) if path.try_exists()? => path,
        _ => PathBuf::from(map),
    };

    Ok(Scenario {
        map,
        width,
        height,
        problems,
    })
}

/// Reads an octile map. Open ground (`.`, `G`) and swamp (`S`) cost nothing, everything else is
/// lethal.
pub fn read_cost_grid(map: &Path) -> Result<CostGrid> {
    let mut lines = BufReader::new(File::open(map)?).lines();

    expect_field(&mut lines, "type", |v| {
        (v == "octile").then_some(()).ok_or("expected type octile")
    })?;
    let height = expect_field(&mut lines, "height", |v| v.parse::<i32>().map_err(|_| "bad height"))?;
    let width = expect_field(&mut lines, "width", |v| v.parse::<i32>().map_err(|_| "bad width"))?;
    if lines.next().transpose()?.as_deref() != Some("map") {
        return Err(Error::other("expected map token"));
    }

    let mut costs = vec![LETHAL; (width * height) as usize];
    for (y, row) in lines.enumerate() {
        let row = row?;
        if y as i32 >= height {
            return Err(Error::other("too many lines of map"));
        }
        for (x, cell) in row.chars().enumerate() {
            if x as i32 >= width {
                return Err(Error::other("too many columns of map"));
            }
            if matches!(cell, '.' | 'G' | 'S') {
                costs[y * width as usize + x] = 0;
            }
        }
    }

    Ok(CostGrid {
        width,
        height,
        costs,
    })
}

fn expect_field<T>(
    lines: &mut Lines<BufReader<File>>,
    name: &str,
    parse: impl FnOnce(&str) -> std::result::Result<T, &'static str>,
) -> Result<T> {
    let (key, value) = pair(lines.next().transpose()?.as_deref())?;
    if key != name {
        return Err(Error::other(format!("expected {name}, got {key}")));
    }
    parse(&value).map_err(Error::other)
}

fn pair(line: Option<&str>) -> Result<(String, String)> {
    let line = line.ok_or_else(|| Error::other("unexpected end of file"))?;
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(a), Some(b), None) => Ok((a.to_owned(), b.to_owned())),
        _ => Err(Error::other(format!("expected two fields: {line}"))),
    }
}
