//! Pixel offsets for placing bubble annotations next to a plotted point.
//!
//! Three heuristics are kept side by side. [`Fixed`] keeps a constant
//! horizontal offset and flips the label at a single PM2.5 threshold.
//! [`Simple`] adds a year shift to that, and [`Tiered`] buckets both the
//! year and the measurement.

use clap::ValueEnum;

/// Computes `(offset_x, offset_y)` in pixels for a measurement in a year.
pub trait OffsetStrategy {
    fn compute_offset(&self, measurement: f64, year: i32) -> (i32, i32);
}

/// Constant `x`, label flipped below the line above 60.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fixed;

impl OffsetStrategy for Fixed {
    fn compute_offset(&self, measurement: f64, _year: i32) -> (i32, i32) {
        (5, if measurement > 60.0 { -10 } else { 10 })
    }
}

/// Two-tier placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple;

impl OffsetStrategy for Simple {
    fn compute_offset(&self, measurement: f64, year: i32) -> (i32, i32) {
        let mut ox = 5;
        if (2000..=2010).contains(&year) {
            ox -= 15;
        } else if year > 2010 {
            ox -= 25;
        }

        let oy = if measurement > 60.0 { -10 } else { 10 };

        (ox, oy)
    }
}

/// Six measurement buckets, with the 50–80 bucket split at 1950.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tiered;

impl OffsetStrategy for Tiered {
    fn compute_offset(&self, measurement: f64, year: i32) -> (i32, i32) {
        let ox = if year < 1900 {
            -20
        } else if year < 1950 {
            5
        } else if year < 2000 {
            -15
        } else {
            -25
        };

        let oy = if measurement <= 15.0 {
            45
        } else if measurement <= 30.0 {
            35
        } else if measurement <= 50.0 {
            20
        } else if measurement <= 80.0 {
            if year < 1950 {
                -25
            } else {
                10
            }
        } else if measurement <= 120.0 {
            -30
        } else {
            40
        };

        (ox, oy)
    }
}

/// Strategy selector for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OffsetKind {
    Fixed,
    Simple,
    Tiered,
}

impl OffsetStrategy for OffsetKind {
    fn compute_offset(&self, measurement: f64, year: i32) -> (i32, i32) {
        match self {
            OffsetKind::Fixed => Fixed.compute_offset(measurement, year),
            OffsetKind::Simple => Simple.compute_offset(measurement, year),
            OffsetKind::Tiered => Tiered.compute_offset(measurement, year),
        }
    }
}

// -- Tests -------------------------------------------------------------------
