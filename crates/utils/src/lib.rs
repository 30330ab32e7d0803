pub mod error;

/// Combines an iterator of `T` and an iterator of `Option<T>`,
/// removing any `None` values in the process
pub fn chain_optional_iter<T>(
	required: impl IntoIterator<Item = T>,
	optional: impl IntoIterator<Item = Option<T>>,
) -> Vec<T> {
	required
		.into_iter()
		.map(Some)
		.chain(optional)
		.flatten()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn optional_items_are_dropped() {
		let merged = chain_optional_iter([1, 2], [None, Some(3), None]);
		assert_eq!(merged, vec![1, 2, 3]);
	}
}
