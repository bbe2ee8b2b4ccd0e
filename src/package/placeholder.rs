use crate::convert::target::TargetFormat;
use crate::manifest::transformer::{slug, transform};
use crate::core::{ExtResult, Manifest};
use crate::package::builder::{PackageArtifact, PackageBuilder};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;

const ICON_FILE: &str = "icon.png";
const POPUP_FILE: &str = "popup.html";
const ICON_SIZE: u32 = 48;

/// Builds a minimal, structurally valid but functionally inert package
/// substituted when an extension cannot legally be repackaged.
///
/// The placeholder carries a manifest, a generated stand-in icon, and a
/// landing page linking to a store search for the original extension's
/// name. It goes through the regular PackageBuilder, so it is a valid
/// package of the target format.
pub struct PlaceholderBuilder {
    target: TargetFormat,
}

impl PlaceholderBuilder {
    pub fn new(target: TargetFormat) -> Self {
        Self { target }
    }

    /// Assemble the placeholder under `output_dir` and return the artifact
    pub fn build(&self, display_name: &str, output_dir: &Path) -> ExtResult<PackageArtifact> {
        let staging = tempfile::tempdir()?;

        fs::write(staging.path().join(ICON_FILE), stand_in_icon_png()?)?;
        fs::write(
            staging.path().join(POPUP_FILE),
            self.landing_page(display_name),
        )?;

        let placeholder_name = format!("{} (Placeholder)", display_name);
        let manifest = self.placeholder_manifest(&placeholder_name)?;

        let output_path = if let Some(ext) = self.target.archive_extension() {
            output_dir.join(format!("{}.{}", slug(&placeholder_name), ext))
        } else {
            output_dir.join(slug(&placeholder_name))
        };

        PackageBuilder::new(self.target).build(staging.path(), &manifest, &output_path)
    }

    fn placeholder_manifest(&self, placeholder_name: &str) -> ExtResult<Manifest> {
        let base = Manifest::from_value(json!({
            "name": placeholder_name,
            "version": "0.1.0",
            "manifest_version": 2,
            "description": "Stand-in for an extension that could not be converted automatically.",
            "icons": { "48": ICON_FILE },
            "browser_action": {
                "default_icon": ICON_FILE,
                "default_popup": POPUP_FILE
            },
            "permissions": []
        }))?;

        // Regular transform path keeps the placeholder consistent with
        // converted packages (gecko id injection etc.)
        Ok(transform(&base, placeholder_name, self.target))
    }

    fn landing_page(&self, display_name: &str) -> String {
        let search_url = self.target.store_search_url(display_name);
        format!(
            r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>{name}</title></head>
  <body style="font-family: sans-serif; width: 320px; padding: 12px;">
    <h2>{name}</h2>
    <p>This extension could not be converted automatically.</p>
    <p><a href="{url}" target="_blank">Search the store for an official version</a></p>
  </body>
</html>
"#,
            name = display_name,
            url = search_url
        )
    }
}

/// Generate a solid-color stand-in icon as a minimal valid PNG.
///
/// Hand-rolled chunks; IDAT is zlib-compressed raw RGBA scanlines.
fn stand_in_icon_png() -> ExtResult<Vec<u8>> {
    // Each scanline: filter byte 0 followed by RGBA pixels
    let mut raw = Vec::with_capacity((ICON_SIZE as usize) * (1 + ICON_SIZE as usize * 4));
    for _ in 0..ICON_SIZE {
        raw.push(0);
        for _ in 0..ICON_SIZE {
            raw.extend_from_slice(&[0x6b, 0x72, 0x80, 0xff]);
        }
    }

    let mut idat = Vec::new();
    let mut encoder = ZlibEncoder::new(&mut idat, Compression::default());
    encoder.write_all(&raw)?;
    encoder.finish()?;

    let mut png = Vec::new();
    png.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&ICON_SIZE.to_be_bytes());
    ihdr.extend_from_slice(&ICON_SIZE.to_be_bytes());
    // 8-bit depth, color type 6 (RGBA), default compression/filter/interlace
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    push_chunk(&mut png, b"IHDR", &ihdr);
    push_chunk(&mut png, b"IDAT", &idat);
    push_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);

    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::validator::PackageValidator;
    use std::fs::File;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn test_png_signature_and_chunks() {
        let png = stand_in_icon_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_firefox_placeholder_is_valid_archive() {
        let out = TempDir::new().unwrap();
        let artifact = PlaceholderBuilder::new(TargetFormat::Firefox)
            .build("Paid Thing", out.path())
            .unwrap();

        let result = PackageValidator::validate(&artifact, "Paid Thing");
        assert!(result.ok, "{:?}", result.reason);

        let mut archive = ZipArchive::new(File::open(&artifact.path).unwrap()).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "manifest.json");

        let mut manifest = String::new();
        archive
            .by_name("manifest.json")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert!(manifest.contains("Paid Thing (Placeholder)"));
        assert!(manifest.contains("browser_specific_settings"));
    }

    #[test]
    fn test_chrome_placeholder_is_directory() {
        let out = TempDir::new().unwrap();
        let artifact = PlaceholderBuilder::new(TargetFormat::Chrome)
            .build("Paid Thing", out.path())
            .unwrap();

        assert!(artifact.path.is_dir());
        assert!(artifact.path.join("icon.png").exists());
        assert!(artifact.path.join("popup.html").exists());

        let popup = fs::read_to_string(artifact.path.join("popup.html")).unwrap();
        assert!(popup.contains("chromewebstore.google.com"));
        assert!(popup.contains("Paid%20Thing"));
    }

    #[test]
    fn test_placeholder_has_empty_permissions() {
        let out = TempDir::new().unwrap();
        let artifact = PlaceholderBuilder::new(TargetFormat::Chrome)
            .build("Anything", out.path())
            .unwrap();
        let manifest = Manifest::load(&artifact.path).unwrap();
        assert_eq!(
            manifest.get("permissions"),
            Some(&serde_json::json!([]))
        );
    }
}
