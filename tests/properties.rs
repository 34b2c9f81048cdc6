use proptest::prelude::*;
use quickcodes::checksum::{compute_check_digit, verify_check_digit};
use quickcodes::{codabar, code128, code39, ean, itf, reed_solomon};
use quickcodes::{encode, render, BarcodeType, EncodeOptions, ErrorCorrectionLevel, ExportFormat, QrCode, Symbol};

fn ecl_strategy() -> impl Strategy<Value = ErrorCorrectionLevel> {
    prop::sample::select(ErrorCorrectionLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn ean13_check_digit_is_idempotent(digits in proptest::collection::vec(0u8..10, 12)) {
        let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let short = ean::encode_ean13(text.as_bytes(), 50).unwrap();

        let check = compute_check_digit(&digits).unwrap();
        let decoded = ean::decode_digits(short.widths()).unwrap();
        prop_assert_eq!(decoded[12], check);
        prop_assert!(verify_check_digit(&decoded));

        let full = format!("{text}{check}");
        prop_assert_eq!(ean::encode_ean13(full.as_bytes(), 50).unwrap(), short);
    }

    #[test]
    fn qr_grid_has_valid_size(data in proptest::collection::vec(any::<u8>(), 0..400), ecl in ecl_strategy()) {
        let options = EncodeOptions::default().with_error_correction(ecl);
        let Symbol::Matrix(grid) = encode(BarcodeType::QRCode, &data, &options).unwrap() else {
            panic!("QR Code should be a matrix symbol");
        };
        prop_assert!((21..=177).contains(&grid.size()));
        prop_assert_eq!((grid.size() - 17) % 4, 0);
    }

    #[test]
    fn qr_ec_codewords_are_reproducible(text in "[0-9A-Z $%*+./:-]{0,120}|\\PC{0,60}", ecl in ecl_strategy()) {
        let qr = QrCode::encode(text.as_bytes(), ecl).unwrap();
        for block in qr.codeword_blocks() {
            prop_assert_eq!(reed_solomon::generate_ec_codewords(&block.data, block.ecc.len()), block.ecc);
        }
    }

    #[test]
    fn code128_decodes_to_payload(data in proptest::collection::vec(0u8..128, 1..60)) {
        let bars = code128::encode_code128(&data, 40).unwrap();
        prop_assert_eq!(code128::decode(bars.widths()).unwrap(), data);
    }

    #[test]
    fn code39_decodes_to_payload(text in "[0-9A-Z. $/+%-]{1,40}") {
        let bars = code39::encode_code39(text.as_bytes(), 40).unwrap();
        prop_assert_eq!(code39::decode(bars.widths()).unwrap(), text.into_bytes());
    }

    #[test]
    fn codabar_decodes_to_payload(text in "[A-D][0-9$:/.+-]{0,30}[A-D]") {
        let bars = codabar::encode_codabar(text.as_bytes(), 40).unwrap();
        prop_assert_eq!(codabar::decode(bars.widths()).unwrap(), text.into_bytes());
    }

    #[test]
    fn itf14_check_digit_matches_gs1(digits in proptest::collection::vec(0u8..10, 13)) {
        let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let bars = itf::encode_itf14(text.as_bytes(), 40).unwrap();
        let decoded = itf::decode(bars.widths()).unwrap();
        prop_assert_eq!(decoded[13], compute_check_digit(&digits).unwrap());
    }

    #[test]
    fn digit_runs_take_fewer_modules_than_text(n in 2usize..40) {
        let digits = vec![b'7'; 2 * n];
        let letters = vec![b'x'; 2 * n];
        let dense = code128::encode_code128(&digits, 40).unwrap();
        let plain = code128::encode_code128(&letters, 40).unwrap();
        prop_assert!(dense.total_width() < plain.total_width());
    }

    #[test]
    fn rendering_is_deterministic(
        data in "[a-zA-Z0-9]{1,40}",
        width in proptest::option::of(1u32..400),
        height in proptest::option::of(1u32..400),
        margin in proptest::option::of(0u32..12),
    ) {
        let mut options = EncodeOptions::default();
        options.width = width;
        options.height = height;
        options.margin = margin;
        for barcode_type in [BarcodeType::QRCode, BarcodeType::Code128] {
            let symbol = encode(barcode_type, &data, &options).unwrap();
            for format in [ExportFormat::SVG, ExportFormat::PNG] {
                prop_assert_eq!(render(&symbol, format, &options).unwrap(), render(&symbol, format, &options).unwrap());
            }
        }
    }
}
