use quickcodes::{
    encode, generate, generate_to_file, BarcodeError, BarcodeType, EncodeOptions, ErrorCorrectionLevel, ExportFormat,
    QrCode, Symbol,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn svg_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn qr_code_svg() {
    let bytes = generate(BarcodeType::QRCode, "Hello, World!", ExportFormat::SVG, &EncodeOptions::default()).unwrap();
    assert!(!bytes.is_empty());
    let svg = svg_text(bytes);
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
}

#[test]
fn ean13_png_signature() {
    let bytes = generate(BarcodeType::EAN13, "123456789012", ExportFormat::PNG, &EncodeOptions::default()).unwrap();
    assert_eq!(bytes[..8], PNG_SIGNATURE);
}

#[test]
fn invalid_error_correction_option() {
    let result = EncodeOptions::from_pairs([("error_correction", "Invalid")])
        .and_then(|options| generate(BarcodeType::QRCode, "test", ExportFormat::SVG, &options));
    assert!(matches!(result, Err(BarcodeError::UnknownOption(_))));
}

#[test]
fn ean13_with_correct_check_digit() {
    let options = EncodeOptions::default();
    let full = generate(BarcodeType::EAN13, "1234567890128", ExportFormat::SVG, &options).unwrap();
    let short = generate(BarcodeType::EAN13, "123456789012", ExportFormat::SVG, &options).unwrap();
    assert_eq!(full, short);
}

#[test]
fn ean13_rejects_wrong_check_digit() {
    let result = generate(BarcodeType::EAN13, "1234567890123", ExportFormat::SVG, &EncodeOptions::default());
    assert!(matches!(result, Err(BarcodeError::UnsupportedInput(_))));
}

#[test]
fn ean13_rejects_letters() {
    let result = generate(BarcodeType::EAN13, "12345678901A", ExportFormat::PNG, &EncodeOptions::default());
    assert!(matches!(result, Err(BarcodeError::UnsupportedInput(_))));
}

#[test]
fn upca_outputs() {
    let options = EncodeOptions::default().with_width(380).with_height(200);
    for format in [ExportFormat::SVG, ExportFormat::PNG] {
        assert!(!generate(BarcodeType::UPCA, "03600029145", format, &options).unwrap().is_empty());
    }
}

#[test]
fn empty_payloads() {
    let options = EncodeOptions::default();
    let qr = encode(BarcodeType::QRCode, "", &options).unwrap();
    assert_eq!(qr.extent(), (21, 21));
    assert!(matches!(
        generate(BarcodeType::Code128, "", ExportFormat::SVG, &options),
        Err(BarcodeError::UnsupportedInput(_))
    ));
}

#[test]
fn qr_payload_too_large() {
    let data = vec![b'a'; 3000];
    let result = generate(BarcodeType::QRCode, &data, ExportFormat::SVG, &EncodeOptions::default());
    assert!(matches!(result, Err(BarcodeError::PayloadTooLarge(_))));
}

#[test]
fn qr_binary_payload() {
    let data: Vec<u8> = (0..=255).collect();
    let options = EncodeOptions::default().with_error_correction(ErrorCorrectionLevel::High);
    let Symbol::Matrix(grid) = encode(BarcodeType::QRCode, &data, &options).unwrap() else {
        panic!("QR Code should be a matrix symbol");
    };
    let qr = QrCode::encode(&data, ErrorCorrectionLevel::High).unwrap();
    assert_eq!(grid.size() as i32, qr.size());
    assert_eq!(qr.data_codewords().len(), QrCode::get_num_data_codewords(qr.version(), ErrorCorrectionLevel::High));
}

#[test]
fn code128_mixed_content() {
    let svg = svg_text(
        generate(BarcodeType::Code128, "Order #4711-20240601", ExportFormat::SVG, &EncodeOptions::default()).unwrap(),
    );
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("</svg>"));
}

#[test]
fn generate_to_file_svg_and_png() {
    let dir = std::env::temp_dir();
    for name in ["quickcodes_generate_test.svg", "quickcodes_generate_test.PNG"] {
        let path = dir.join(name);
        generate_to_file(BarcodeType::QRCode, "file output", &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        if name.ends_with("svg") {
            assert!(svg_text(bytes).contains("</svg>"));
        } else {
            assert_eq!(bytes[..8], PNG_SIGNATURE);
        }
    }
}

#[test]
fn generate_to_file_leaves_target_on_failure() {
    let path = std::env::temp_dir().join("quickcodes_failure_test.svg");
    std::fs::write(&path, b"keep").unwrap();
    let result = generate_to_file(BarcodeType::EAN13, "not digits", &path);
    let contents = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(BarcodeError::UnsupportedInput(_))));
    assert_eq!(contents, b"keep");
}

#[test]
fn options_from_json() {
    let options: EncodeOptions =
        serde_json::from_str(r#"{"width": 200, "height": 200, "error_correction": "Quartile"}"#).unwrap();
    let bytes = generate(BarcodeType::QRCode, "json", ExportFormat::PNG, &options).unwrap();
    assert_eq!(bytes[..8], PNG_SIGNATURE);
}

#[test]
fn oversized_margin_is_rejected() {
    assert!(matches!(
        EncodeOptions::from_pairs([("margin", "4294967295")]),
        Err(BarcodeError::UnknownOption(_))
    ));
    let mut options = EncodeOptions::default();
    options.margin = Some(u32::MAX);
    let result = generate(BarcodeType::Code128, "margin", ExportFormat::SVG, &options);
    assert!(matches!(result, Err(BarcodeError::UnknownOption(_))));
}

#[test]
fn oversized_png_is_rejected() {
    let options = EncodeOptions::from_pairs([("width", "4294967295"), ("height", "4294967295")]).unwrap();
    let result = generate(BarcodeType::QRCode, "big", ExportFormat::PNG, &options);
    assert!(matches!(result, Err(BarcodeError::UnknownOption(_))));

    let tall = EncodeOptions::default().with_bar_height(u32::MAX);
    let result = generate(BarcodeType::EAN13, "123456789012", ExportFormat::PNG, &tall);
    assert!(matches!(result, Err(BarcodeError::UnknownOption(_))));
}

#[test]
fn more_linear_symbologies() {
    for (ty, data) in [
        (BarcodeType::Code39, "HELLO-39"),
        (BarcodeType::ITF14, "1234567890123"),
        (BarcodeType::Codabar, "A1234567890B"),
    ] {
        let svg = svg_text(generate(ty, data, ExportFormat::SVG, &EncodeOptions::default()).unwrap());
        assert!(svg.contains("</svg>"), "{ty}");
        let png = generate(ty, data, ExportFormat::PNG, &EncodeOptions::default()).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);
        assert!(matches!(encode(ty, "", &EncodeOptions::default()), Err(BarcodeError::UnsupportedInput(_))));
    }
}

#[test]
fn human_readable_text() {
    let options = EncodeOptions::from_pairs([("include_text", "true")]).unwrap();
    let svg = svg_text(generate(BarcodeType::EAN13, "123456789012", ExportFormat::SVG, &options).unwrap());
    assert!(svg.contains(">1234567890128</text>"));
    let plain = svg_text(generate(BarcodeType::EAN13, "123456789012", ExportFormat::SVG, &EncodeOptions::default()).unwrap());
    assert!(!plain.contains("<text"));
}
