use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn data_urls_decode_base64_and_raw() {
    assert_eq!(parse_data_url("image/png;base64,aGVsbG8=").unwrap(), b"hello");
    assert_eq!(parse_data_url(",raw").unwrap(), b"raw");
    assert!(parse_data_url("image/png;base64").is_err());
    assert!(parse_data_url("image/png;base64,@@@").is_err());
}

#[test]
fn local_source_reads_relative_files_and_refuses_network() {
    let dir = PathBuf::from("target").join("source_unit");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("a.bin"), b"abc").unwrap();

    let src = LocalImageSource::new(&dir);
    let fetched = src.fetch("a.bin").unwrap();
    assert_eq!(fetched.bytes, b"abc");
    assert_eq!(fetched.pixel_access, PixelAccess::Readable);

    assert!(matches!(
        src.fetch("missing.bin").unwrap_err(),
        EditorError::Load(_)
    ));
    assert!(matches!(
        src.fetch("https://media.example/x.gif").unwrap_err(),
        EditorError::Load(_)
    ));
}

#[test]
fn closures_are_image_sources() {
    let src = |url: &str| -> EditorResult<FetchedImage> {
        Ok(FetchedImage {
            bytes: url.as_bytes().to_vec(),
            pixel_access: PixelAccess::Restricted,
        })
    };
    let fetched = src.fetch("xyz").unwrap();
    assert_eq!(fetched.bytes, b"xyz");
    assert_eq!(fetched.pixel_access, PixelAccess::Restricted);
}
