use std::{
	fs,
	path::{Path, PathBuf},
};

use exif::{In, Reader, Tag, Value};
use gt_core::{
	process_images_from_csv, run_tasks, BatchDriver, BatchEvent, BatchJob, Error, StopFlag, Task,
	TaskOutcome,
};
use gt_media_metadata::jpeg::JpegMetadata;
use image::{ImageFormat, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tracing_test::traced_test;

fn photo(path: &Path) {
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	RgbImage::from_pixel(8, 8, Rgb([120, 120, 120]))
		.save_with_format(path, ImageFormat::Jpeg)
		.unwrap();
}

fn gps_refs(path: &Path) -> (String, String) {
	let tiff = JpegMetadata::from_bytes(fs::read(path).unwrap())
		.unwrap()
		.exif_tiff()
		.expect("tagged photo should carry EXIF");
	let exif = Reader::new().read_raw(tiff.to_vec()).unwrap();

	let ascii = |tag| match &exif.get_field(tag, In::PRIMARY).unwrap().value {
		Value::Ascii(values) => String::from_utf8_lossy(&values[0]).into_owned(),
		other => panic!("unexpected value {other:?}"),
	};

	(ascii(Tag::GPSLatitudeRef), ascii(Tag::GPSLongitudeRef))
}

fn audit_rows(path: &Path) -> Vec<Vec<String>> {
	let content = fs::read_to_string(path).unwrap();
	let content = content.strip_prefix('\u{feff}').unwrap();

	csv::ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.from_reader(content.as_bytes())
		.records()
		.map(|record| record.unwrap().iter().map(ToString::to_string).collect())
		.collect()
}

struct Fixture {
	_dir: tempfile::TempDir,
	csv: PathBuf,
	images: PathBuf,
	output: PathBuf,
}

fn fixture(csv: &str, photos: &[&str]) -> Fixture {
	let dir = tempdir().unwrap();
	let images = dir.path().join("images");
	for name in photos {
		photo(&images.join(name));
	}

	let csv_path = dir.path().join("points.csv");
	fs::write(&csv_path, csv).unwrap();

	Fixture {
		csv: csv_path,
		images,
		output: dir.path().join("tagged"),
		_dir: dir,
	}
}

#[test]
fn four_column_rows_are_tagged_in_place() {
	let fixture = fixture("39.9042,116.4075,100,a.jpg\n", &["a.jpg"]);

	let result = process_images_from_csv(&BatchJob::new(&fixture.csv, &fixture.images)).unwrap();

	assert_eq!(result.success_count, 1);
	assert_eq!(result.failed_count, 0);
	assert!(!result.stopped);
	assert_eq!(
		gps_refs(&fixture.images.join("a.jpg")),
		("N".to_string(), "E".to_string())
	);

	// in place runs put the audit CSV next to the input CSV
	let audit = result.audit_csv.unwrap();
	assert_eq!(audit.parent(), fixture.csv.parent());
	assert_eq!(
		audit_rows(&audit),
		[["39.9042", "116.4075", "100", "a.jpg", "a.jpg"]]
	);
}

#[test]
#[traced_test]
fn malformed_row_fails_and_the_batch_goes_on() {
	let fixture = fixture(
		"39.9,116.4,a.jpg\n\
		-33.4489,-70.6693,5,b.jpg\n\
		40,117,1,missing.jpg\n\
		41,118,1,\n",
		&["a.jpg", "B.JPG"],
	);

	let mut events = Vec::new();
	let result = BatchDriver::default()
		.run(
			&BatchJob::new(&fixture.csv, &fixture.images)
				.with_output_dir(Some(fixture.output.clone())),
			|event| events.push(event.clone()),
		)
		.unwrap();

	assert_eq!(result.success_count, 1);
	assert_eq!(result.failed_count, 2);
	assert_eq!(result.skipped_count, 1);
	assert!(result.errors[0].starts_with("line 1: unsupported column count 3"));
	assert!(result.errors[1].contains("missing.jpg"));

	assert_eq!(events[0], BatchEvent::Started { total: 4 });
	assert!(matches!(events[1], BatchEvent::Failed { line: 1, .. }));
	assert!(matches!(&events[2], BatchEvent::Tagged { line: 2, filename, .. } if filename == "b.jpg"));
	assert!(matches!(events[4], BatchEvent::Skipped { line: 4, .. }));

	let tagged = fs::read_dir(&fixture.output)
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.filter(|path| path.extension().is_some_and(|ext| ext == "jpg"))
		.collect::<Vec<_>>();
	assert_eq!(tagged.len(), 1);
	assert!(tagged[0]
		.file_name()
		.unwrap()
		.to_str()
		.unwrap()
		.ends_with("01.jpg"));
	assert_eq!(
		gps_refs(&tagged[0]),
		("S".to_string(), "W".to_string())
	);

	// only the row that reached the writer is audited
	let audit = result.audit_csv.unwrap();
	assert_eq!(audit.parent(), Some(fixture.output.as_path()));
	assert_eq!(audit_rows(&audit).len(), 1);

	assert!(logs_contain("unsupported column count 3"));
	assert!(logs_contain("photo not found: missing.jpg"));
}

#[test]
fn reruns_count_the_same() {
	let fixture = fixture(
		"IMG_1.jpg,2024-08-18 10:30:00,116.4,39.9,100,0,0,90\n\
		IMG_2.jpg,,116.5,39.8,,,,\n\
		IMG_3.jpg,,not-a-number,39.8,1,0,0,0\n",
		&["IMG_1.jpg", "IMG_2.jpg", "IMG_3.jpg"],
	);
	let job = BatchJob::new(&fixture.csv, &fixture.images).with_xmp(true);

	let first = process_images_from_csv(&job).unwrap();
	let second = process_images_from_csv(&job).unwrap();

	assert_eq!(
		(first.success_count, first.failed_count, first.skipped_count),
		(2, 1, 0)
	);
	assert_eq!(
		(second.success_count, second.failed_count, second.skipped_count),
		(first.success_count, first.failed_count, first.skipped_count)
	);
}

#[test]
fn stopping_before_the_run_processes_nothing() {
	let fixture = fixture("39,116,1,a.jpg\n40,117,1,b.jpg\n", &["a.jpg", "b.jpg"]);
	let stop = StopFlag::new();
	stop.stop();

	let mut events = Vec::new();
	let result = BatchDriver::new(stop)
		.run(&BatchJob::new(&fixture.csv, &fixture.images), |event| {
			events.push(event.clone());
		})
		.unwrap();

	assert!(result.stopped);
	assert_eq!(result.processed(), 0);
	assert_eq!(result.audit_csv, None);
	assert_eq!(events.last(), Some(&BatchEvent::Stopped { remaining: 2 }));
}

#[test]
fn header_mapping_and_an_unreadable_camera_profile() {
	let fixture = fixture(
		"photo,yaw,lon,lat,filename\n\
		x,370,116.4,39.9,a.jpg\n",
		&["a.jpg"],
	);
	let opt = fixture.csv.with_file_name("broken.opt");
	fs::write(&opt, "<Camera><FocalLength>abc</FocalLength></Camera>").unwrap();

	let result = process_images_from_csv(
		&BatchJob::new(&fixture.csv, &fixture.images)
			.with_output_dir(Some(fixture.output.clone()))
			.with_opt_file(Some(opt)),
	)
	.unwrap();

	assert_eq!(result.success_count, 1);
	assert_eq!(result.warnings.len(), 1);
	assert!(result.warnings[0].starts_with("camera profile ignored"));

	let audit = audit_rows(&result.audit_csv.unwrap());
	assert_eq!(audit[0][..5], ["x", "370", "116.4", "39.9", "a.jpg"]);
}

#[test]
fn missing_inputs_are_fatal() {
	let fixture = fixture("39,116,1,a.jpg\n", &["a.jpg"]);

	assert!(matches!(
		process_images_from_csv(&BatchJob::new(
			fixture.csv.with_file_name("nope.csv"),
			&fixture.images
		)),
		Err(Error::CsvNotFound(_))
	));
	assert!(matches!(
		process_images_from_csv(&BatchJob::new(&fixture.csv, fixture.images.join("nope"))),
		Err(Error::ImageDirNotFound(_))
	));
}

#[test]
fn tasks_run_only_when_their_folder_is_consistent() {
	let dir = tempdir().unwrap();

	let good = dir.path().join("good");
	photo(&good.join("a.jpg"));
	fs::write(good.join("points.csv"), "39,116,1,a.jpg\n").unwrap();

	let short = dir.path().join("short");
	photo(&short.join("a.jpg"));
	fs::write(short.join("points.csv"), "39,116,1,a.jpg\n40,117,1,b.jpg\n").unwrap();

	let tasks = [
		Task {
			input_dir: good.clone(),
			output_dir: dir.path().join("good-out"),
		},
		Task {
			input_dir: short,
			output_dir: dir.path().join("short-out"),
		},
	];

	let outcomes = run_tasks(&tasks, &BatchDriver::default(), None, false, |_, _| {});

	assert_eq!(outcomes.len(), 2);
	match &outcomes[0].1 {
		Ok(TaskOutcome::Completed(result)) => assert_eq!(result.success_count, 1),
		other => panic!("unexpected outcome {other:?}"),
	}
	assert!(matches!(
		outcomes[1].1,
		Ok(TaskOutcome::Skipped(_))
	));
	assert!(!dir.path().join("short-out").exists());
}

#[test]
fn stopping_mid_run_finishes_the_current_row() {
	let fixture = fixture(
		"39,116,1,a.jpg\n40,117,1,b.jpg\n41,118,1,c.jpg\n",
		&["a.jpg", "b.jpg", "c.jpg"],
	);
	let stop = StopFlag::new();

	let mut events = Vec::new();
	let result = BatchDriver::new(stop.clone())
		.run(
			&BatchJob::new(&fixture.csv, &fixture.images)
				.with_output_dir(Some(fixture.output.clone())),
			|event| {
				if matches!(event, BatchEvent::Tagged { .. }) {
					stop.stop();
				}
				events.push(event.clone());
			},
		)
		.unwrap();

	assert!(result.stopped);
	assert_eq!(result.success_count, 1);
	assert_eq!(result.processed(), 1);
	assert_eq!(events.last(), Some(&BatchEvent::Stopped { remaining: 2 }));
	assert_eq!(audit_rows(&result.audit_csv.unwrap()).len(), 1);
}

#[test]
fn tasks_sharing_an_output_folder_keep_every_photo() {
	let dir = tempdir().unwrap();
	let output = dir.path().join("out");

	let tasks = ["north", "south"].map(|name| {
		let input = dir.path().join(name);
		photo(&input.join("a.jpg"));
		fs::write(input.join("points.csv"), "39,116,1,a.jpg\n").unwrap();
		Task {
			input_dir: input,
			output_dir: output.clone(),
		}
	});

	let outcomes = run_tasks(&tasks, &BatchDriver::default(), None, false, |_, _| {});

	let tagged = outcomes
		.iter()
		.map(|(_, outcome)| match outcome {
			Ok(TaskOutcome::Completed(result)) => result.success_count,
			other => panic!("unexpected outcome {other:?}"),
		})
		.sum::<usize>();

	let files = fs::read_dir(&output)
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.collect::<Vec<_>>();
	let count = |extension: &str| {
		files
			.iter()
			.filter(|path| path.extension().is_some_and(|ext| ext == extension))
			.count()
	};

	assert_eq!(tagged, 2);
	assert_eq!(count("jpg"), tagged);
	assert_eq!(count("csv"), 2);
}
