//! Brick grid: existence and destruction bookkeeping
//!
//! Brick ids are derived from grid coordinates (`row * columns + col`) so they
//! stay stable across restarts and between runs with the same layout.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::BrickColor;
use super::geometry::{Rect, validate_size};
use crate::consts::MAX_BRICKS;
use crate::error::GeometryError;

/// Shape of the brick grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: u32,
    pub columns: u32,
    /// Consecutive rows sharing a palette color
    pub rows_per_color: u32,
    pub brick_size: Vec2,
    /// Spacing between neighbouring bricks
    pub gap: f32,
    /// Top-left corner of the top-left brick
    pub origin: Vec2,
    /// Optional per-cell presence, indexed `[row][col]`; missing cells are present
    #[serde(default)]
    pub mask: Option<Vec<Vec<bool>>>,
}

impl GridLayout {
    fn is_present(&self, row: u32, col: u32) -> bool {
        self.mask
            .as_ref()
            .and_then(|m| m.get(row as usize))
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(true)
    }

    fn top_left(&self, row: u32, col: u32) -> Vec2 {
        let step = self.brick_size + Vec2::splat(self.gap);
        self.origin + Vec2::new(col as f32 * step.x, row as f32 * step.y)
    }
}

/// Palette color for a row: bands of `rows_per_color` rows, repeating
pub fn color_for_row(row: u32, rows_per_color: u32) -> BrickColor {
    let band = row / rows_per_color.max(1);
    BrickColor::PALETTE[band as usize % BrickColor::PALETTE.len()]
}

/// A single brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
    pub color: BrickColor,
    pub alive: bool,
}

impl Brick {
    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        self.rect.center - self.rect.half_size
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }
}

/// Owner of every brick. The only writer of brick liveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: u32,
    /// All bricks ever created this session, sorted by id
    bricks: Vec<Brick>,
    live: usize,
    /// Ids in destruction order
    destroyed: Vec<u32>,
}

impl BrickGrid {
    /// Build the grid, assigning `id = row * columns + col`
    pub fn instantiate(layout: &GridLayout) -> Result<Self, GeometryError> {
        if layout.rows == 0 || layout.columns == 0 {
            return Err(GeometryError::EmptyGrid {
                rows: layout.rows,
                columns: layout.columns,
            });
        }
        let cells = layout
            .rows
            .checked_mul(layout.columns)
            .filter(|&cells| cells <= MAX_BRICKS)
            .ok_or(GeometryError::GridTooLarge {
                rows: layout.rows,
                columns: layout.columns,
                max: MAX_BRICKS,
            })?;
        validate_size("brick", layout.brick_size)?;

        let mut bricks = Vec::with_capacity(cells as usize);
        for row in 0..layout.rows {
            let color = color_for_row(row, layout.rows_per_color);
            for col in 0..layout.columns {
                if !layout.is_present(row, col) {
                    continue;
                }
                let top_left = layout.top_left(row, col);
                let rect = Rect::from_top_left("brick", top_left, layout.brick_size)?;
                bricks.push(Brick {
                    id: row * layout.columns + col,
                    row,
                    col,
                    rect,
                    color,
                    alive: true,
                });
            }
        }

        log::info!(
            "Brick grid {}x{}: {} bricks",
            layout.rows,
            layout.columns,
            bricks.len()
        );

        Ok(Self {
            columns: layout.columns,
            live: bricks.len(),
            bricks,
            destroyed: Vec::new(),
        })
    }

    /// Mark a brick dead. Returns its color and the live count left, or
    /// `None` if the id is unknown or the brick is already dead.
    pub fn destroy(&mut self, id: u32) -> Option<(BrickColor, usize)> {
        let idx = self.bricks.binary_search_by_key(&id, |b| b.id).ok()?;
        let brick = &mut self.bricks[idx];
        if !brick.alive {
            log::debug!("Brick {id} already destroyed, ignoring");
            return None;
        }
        brick.alive = false;
        self.live -= 1;
        self.destroyed.push(id);
        Some((brick.color, self.live))
    }

    /// Start a new session on the same layout: every brick alive again,
    /// destruction history cleared
    pub fn reset(&mut self) {
        for brick in &mut self.bricks {
            brick.alive = true;
        }
        self.live = self.bricks.len();
        self.destroyed.clear();
    }

    /// True when no live bricks remain
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn get(&self, id: u32) -> Option<&Brick> {
        self.bricks
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|idx| &self.bricks[idx])
    }

    /// Every brick, dead or alive, in id order
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    /// Live bricks in id order
    pub fn live_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.alive)
    }

    /// Ids destroyed this session, oldest first
    pub fn destroyed_ids(&self) -> &[u32] {
        &self.destroyed
    }
}
