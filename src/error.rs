//! The Error type of this crate

use thiserror::Error;

/// Everything that can go wrong while setting up a search.
///
/// Searching itself never fails with an Error: an unsuccessful search is reported through the
/// [`PathStatus`](crate::PathStatus) of the returned [`Path`](crate::Path).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
	/// A field of [`PathFindingSettings`](crate::PathFindingSettings) has an unusable value
	#[error("setting `{name}` must be {expected}, got {value}")]
	InvalidSetting {
		/// name of the offending field
		name: &'static str,
		/// description of the accepted values
		expected: &'static str,
		/// the rejected value
		value: f64,
	},

	/// A [`HeightField`](crate::terrain::HeightField) needs at least 2x2 samples to interpolate
	#[error("height field needs at least 2x2 samples, got {width}x{depth}")]
	HeightFieldTooSmall {
		/// number of samples along x
		width: usize,
		/// number of samples along z
		depth: usize,
	},

	/// The dimensions of a [`HeightField`](crate::terrain::HeightField) describe more samples than
	/// can be addressed
	#[error("height field of {width}x{depth} samples is too large")]
	HeightFieldTooLarge {
		/// number of samples along x
		width: usize,
		/// number of samples along z
		depth: usize,
	},

	/// The number of heights does not match the dimensions of a [`HeightField`](crate::terrain::HeightField)
	#[error("height field of {width}x{depth} samples needs {} heights, got {actual}", .width * .depth)]
	HeightCountMismatch {
		/// number of samples along x
		width: usize,
		/// number of samples along z
		depth: usize,
		/// number of heights provided
		actual: usize,
	},

	/// The sample spacing of a [`HeightField`](crate::terrain::HeightField) is not a positive number
	#[error("height field spacing must be positive and finite, got {0}")]
	InvalidSpacing(f32),
}
