//! # singular
//!
//! Dense-matrix singular value decomposition in pure Rust, no-std compatible.
//! Factors a real m×n matrix `A` into `U · S · Vᵀ` where `U` and `V` have
//! orthonormal columns and `S` is diagonal with non-negative entries sorted
//! descending.
//!
//! ## Quick start
//!
//! ```
//! use singular::{Matrix, Svd};
//!
//! let a = Matrix::from_rows(2, 2, &[4.0_f64, 0.0, 3.0, -5.0]);
//! let svd = Svd::decompose(&a);
//!
//! // Singular values, sorted descending: √40 and √10
//! assert!((svd.singular_values()[0] - 6.3246).abs() < 1e-4);
//! assert!((svd.singular_values()[1] - 3.1623).abs() < 1e-4);
//!
//! // U·S·Vᵀ reconstructs A
//! let back = svd.compose();
//! assert!((&a - &back).norm_l1() < 1e-10);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`] — Heap-allocated `Matrix<T>` with runtime dimensions.
//!   Column-major `Vec<T>` storage. Includes arithmetic, matrix multiply,
//!   transpose, norms, and the fallible [`Matrix::from_nested`] constructor
//!   that validates rectangular input.
//!
//! - [`linalg`] — The decomposition core: Householder bidiagonalization
//!   followed by implicit-shift QR diagonalization (Golub–Reinsch), with
//!   descending reorder, sign normalization, and numeric-rank estimation.
//!   [`Svd::decompose`] runs the whole pipeline; per-value iteration is
//!   bounded, and hitting the bound is reported through [`Convergence`]
//!   rather than an error.
//!
//! - [`traits`] — Element trait hierarchy and the matrix-access seam:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used by the decomposition
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access; the
//!     decomposition works on any implementor, `Matrix<T>` is the provided one
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Hardware FPU via system libm |
//! | `libm`  | no       | Pure-Rust software float fallback for no-std targets |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod linalg;
pub mod matrix;
pub mod traits;

pub use linalg::{Convergence, RankTolerance, Svd};
pub use matrix::{Matrix, ShapeError};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
