//! Sample JavaScript sources for tests
//!
//! Each fixture is a file name plus its content; `write_to` drops it into a
//! directory so tests can point globs at it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A JavaScript source file used as extractor input.
#[derive(Clone, Debug)]
pub struct SourceFixture {
    pub name: String,
    pub content: String,
}

impl SourceFixture {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Two documented global functions
    pub fn math() -> Self {
        Self::new(
            "math.js",
            r#"/**
 * Adds two numbers.
 * @param {number} a - first operand
 * @param {number} b - second operand
 * @returns {number} the sum
 * @example
 * add(1, 2) // 3
 */
function add (a, b) {
  return a + b
}

/**
 * Subtracts `b` from `a`.
 * @param {number} a
 * @param {number} b
 * @returns {number}
 */
function subtract (a, b) {
  return a - b
}
"#,
        )
    }

    /// A module exporting a class with instance and static members
    pub fn shapes() -> Self {
        Self::new(
            "shapes.js",
            r#"/**
 * Geometry helpers.
 * @module shapes
 */

/**
 * A circle.
 */
export class Circle {
  /**
   * Create a circle.
   * @param {number} radius - the radius
   */
  constructor (radius) {
    /** The radius. @type {number} */
    this.radius = radius
  }

  /**
   * Area of the circle.
   * @returns {number}
   */
  area () {
    return Math.PI * this.radius ** 2
  }

  /**
   * Unit circle.
   * @returns {Circle}
   */
  static unit () {
    return new Circle(1)
  }
}

/** Default precision. */
export const PRECISION = 2
"#,
        )
    }

    /// Documented but marked private
    pub fn private() -> Self {
        Self::new(
            "private.js",
            r#"/**
 * Visible helper.
 */
function visible () {}

/**
 * Internal helper.
 * @private
 */
function hidden () {}
"#,
        )
    }

    /// A doc comment that is never closed
    pub fn unterminated() -> Self {
        Self::new("broken.js", "/**\n * Never closed.\nfunction broken () {}\n")
    }

    /// Write the fixture into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, &self.content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
