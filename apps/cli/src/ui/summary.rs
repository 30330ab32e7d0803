//! Human readable run summaries

use gt_core::ProcessingResult;

pub fn print_result(result: &ProcessingResult) {
	println!(
		"{} tagged, {} failed, {} skipped{}",
		result.success_count,
		result.failed_count,
		result.skipped_count,
		if result.stopped { " (stopped)" } else { "" }
	);

	if !result.errors.is_empty() {
		println!();
		println!("Errors:");
		for error in &result.errors {
			println!("  {error}");
		}
	}

	if !result.warnings.is_empty() {
		println!();
		println!("Warnings:");
		for warning in &result.warnings {
			println!("  {warning}");
		}
	}

	if let Some(audit) = &result.audit_csv {
		println!();
		println!("Audit CSV: {}", audit.display());
	}
}
