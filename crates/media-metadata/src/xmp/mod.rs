//! DJI flavoured XMP packets.

use std::io::Cursor;

use gt_utils::chain_optional_iter;
use quick_xml::{
	events::{BytesEnd, BytesStart, Event},
	Writer,
};

use crate::{camera::CameraProfile, DewarpData, ExifTimestamp, GeoRecord, Result};

/// Identifies an XMP payload inside a JPEG APP1 segment.
pub const XMP_APP1_PREFIX: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

const XPACKET_BEGIN: &str = "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n";
const XPACKET_END: &str = "\n<?xpacket end=\"w\"?>";
const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const DEFAULT_TOOLKIT: &str = "geotag";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
	DroneDji,
	Exif,
	Xmp,
}

impl Namespace {
	pub const ALL: [Self; 3] = [Self::DroneDji, Self::Exif, Self::Xmp];

	#[must_use]
	pub const fn prefix(self) -> &'static str {
		match self {
			Self::DroneDji => "drone-dji",
			Self::Exif => "exif",
			Self::Xmp => "xmp",
		}
	}

	#[must_use]
	pub const fn uri(self) -> &'static str {
		match self {
			Self::DroneDji => "http://www.dji.com/drone-dji/1.0/",
			Self::Exif => "http://ns.adobe.com/exif/1.0/",
			Self::Xmp => "http://ns.adobe.com/xap/1.0/",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmpProperty {
	pub namespace: Namespace,
	pub name: &'static str,
	pub value: String,
}

impl XmpProperty {
	fn new(namespace: Namespace, name: &'static str, value: impl ToString) -> Self {
		Self {
			namespace,
			name,
			value: value.to_string(),
		}
	}

	/// `prefix:Name`
	#[must_use]
	pub fn qualified_name(&self) -> String {
		format!("{}:{}", self.namespace.prefix(), self.name)
	}
}

/// The XMP capability. A [`crate::MetadataWriter`] only emits XMP when it holds one of these.
#[derive(Debug, Clone)]
pub struct DjiXmp {
	toolkit: String,
}

impl Default for DjiXmp {
	fn default() -> Self {
		Self {
			toolkit: DEFAULT_TOOLKIT.to_string(),
		}
	}
}

impl DjiXmp {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the `x:xmptk` value stamped on every packet.
	#[must_use]
	pub fn with_toolkit(mut self, toolkit: impl Into<String>) -> Self {
		self.toolkit = toolkit.into();
		self
	}

	/// Every property written for `record`, DJI's `GpsLongtitude` spelling included.
	#[must_use]
	pub fn properties(
		&self,
		record: &GeoRecord,
		timestamp: Option<&ExifTimestamp>,
		camera: Option<&CameraProfile>,
		dewarp: Option<&DewarpData>,
	) -> Vec<XmpProperty> {
		use Namespace::{DroneDji, Exif, Xmp};

		let position = record.position();
		let attitude = record.attitude();

		let focal_length = camera
			.map(|camera| camera.focal_length)
			.filter(|focal| *focal > 0.0);
		let equivalent = camera.and_then(CameraProfile::focal_length_35mm);
		let created = timestamp.map(ExifTimestamp::to_xmp);

		let mut properties = chain_optional_iter(
			[
				XmpProperty::new(DroneDji, "GpsLatitude", position.latitude()),
				XmpProperty::new(DroneDji, "GpsLongtitude", position.longitude()),
				XmpProperty::new(DroneDji, "AbsoluteAltitude", position.altitude()),
				XmpProperty::new(DroneDji, "FlightRollDegree", attitude.roll()),
				XmpProperty::new(DroneDji, "FlightPitchDegree", attitude.pitch()),
				XmpProperty::new(DroneDji, "FlightYawDegree", attitude.yaw()),
			],
			[
				focal_length.map(|focal| XmpProperty::new(Exif, "FocalLength", focal)),
				equivalent.map(|eq| XmpProperty::new(Exif, "FocalLengthIn35mmFilm", eq)),
				created
					.clone()
					.map(|date| XmpProperty::new(Xmp, "CreateDate", date)),
				created.map(|date| XmpProperty::new(Xmp, "ModifyDate", date)),
			],
		);

		if let Some(dewarp) = dewarp {
			properties.extend([
				XmpProperty::new(DroneDji, "DewarpData", dewarp),
				XmpProperty::new(DroneDji, "DewarpFlag", 0),
				XmpProperty::new(DroneDji, "CalibratedFocalLength", dewarp.fx),
				XmpProperty::new(DroneDji, "CalibratedOpticalCenterX", dewarp.optical_center.0),
				XmpProperty::new(DroneDji, "CalibratedOpticalCenterY", dewarp.optical_center.1),
			]);
		}

		properties
	}

	/// Serializes `properties` as a complete `xpacket`, ready to be placed after
	/// [`XMP_APP1_PREFIX`].
	pub fn encode(&self, properties: &[XmpProperty]) -> Result<Vec<u8>> {
		let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 1);

		let mut xmpmeta = BytesStart::new("x:xmpmeta");
		xmpmeta.push_attribute(("xmlns:x", "adobe:ns:meta/"));
		xmpmeta.push_attribute(("x:xmptk", self.toolkit.as_str()));
		writer.write_event(Event::Start(xmpmeta))?;

		let mut rdf = BytesStart::new("rdf:RDF");
		rdf.push_attribute(("xmlns:rdf", RDF_NAMESPACE));
		writer.write_event(Event::Start(rdf))?;

		let mut description = BytesStart::new("rdf:Description");
		description.push_attribute(("rdf:about", ""));
		for namespace in Namespace::ALL {
			let declaration = format!("xmlns:{}", namespace.prefix());
			description.push_attribute((declaration.as_str(), namespace.uri()));
		}
		for property in properties {
			let name = property.qualified_name();
			description.push_attribute((name.as_str(), property.value.as_str()));
		}
		writer.write_event(Event::Empty(description))?;

		writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
		writer.write_event(Event::End(BytesEnd::new("x:xmpmeta")))?;

		let body = writer.into_inner().into_inner();

		let mut packet = Vec::with_capacity(XPACKET_BEGIN.len() + body.len() + XPACKET_END.len());
		packet.extend_from_slice(XPACKET_BEGIN.as_bytes());
		packet.extend(body);
		packet.extend_from_slice(XPACKET_END.as_bytes());

		Ok(packet)
	}
}
