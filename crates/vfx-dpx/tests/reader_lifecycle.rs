//! Reader state machine, user data and file-backed sources.

mod common;

use common::{DpxBuilder, Element};
use std::io::Write;
use vfx_dpx::{
    DpxError, DpxReader, DpxReaderOptions, Endian, FormatError, PixelData, ReaderState,
};

fn two_lumas() -> DpxBuilder {
    DpxBuilder::new(Endian::Big, 4, 2)
        .element(Element::new(6, 8, (1..=8).collect()))
        .element(Element::new(6, 8, (11..=18).collect()))
}

#[test]
fn lifecycle() {
    let mut reader: DpxReader<Vec<u8>> = DpxReader::new();
    assert_eq!(reader.state(), ReaderState::Closed);
    assert_eq!(reader.subimage_count(), 0);
    assert!(matches!(reader.select(0), Err(DpxError::InvalidState(_))));
    assert!(matches!(reader.read_scanline(0), Err(DpxError::InvalidState(_))));

    reader.open(two_lumas().build()).unwrap();
    assert_eq!(reader.state(), ReaderState::HeaderParsed);
    assert_eq!(reader.subimage_count(), 2);
    assert!(matches!(reader.read_scanline(0), Err(DpxError::InvalidState(_))));

    reader.select(1).unwrap();
    assert_eq!(reader.state(), ReaderState::SubimageSelected(1));
    assert_eq!(reader.read_scanline(1).unwrap().as_u8().unwrap(), &[15, 16, 17, 18]);

    // reselecting is a no-op
    let before = reader.spec().unwrap().clone();
    assert_eq!(reader.select(1).unwrap(), &before);

    // a failed select keeps the current selection
    assert!(matches!(reader.select(2), Err(DpxError::OutOfRange(_))));
    assert_eq!(reader.current_subimage(), Some(1));
    assert_eq!(reader.read_scanline(0).unwrap().as_u8().unwrap(), &[11, 12, 13, 14]);

    reader.close();
    assert_eq!(reader.state(), ReaderState::Closed);
    reader.close();
    assert_eq!(reader.state(), ReaderState::Closed);
    assert!(reader.spec().is_none());
}

#[test]
fn bad_headers_leave_reader_closed() {
    let mut reader = DpxReader::new();
    reader.open(two_lumas().build()).unwrap();

    let mut bad = two_lumas().build();
    bad[..4].copy_from_slice(b"NOPE");
    match reader.open(bad) {
        Err(DpxError::Format(FormatError::BadMagic(m))) => {
            assert_eq!(m, u32::from_be_bytes(*b"NOPE"));
        }
        other => panic!("expected BadMagic, got {:?}", other),
    }
    assert_eq!(reader.state(), ReaderState::Closed);

    let mut short = two_lumas().build();
    short.truncate(100);
    match reader.open(short) {
        Err(DpxError::Format(FormatError::Truncated { needed, available })) => {
            assert_eq!((needed, available), (2048, 100));
        }
        other => panic!("expected Truncated, got {:?}", other),
    }
    assert_eq!(reader.state(), ReaderState::Closed);
}

#[test]
fn user_data_on_every_subimage() {
    let blob: Vec<u8> = (0..16).collect();
    let file = two_lumas().user_data(&blob).build();

    let mut reader = DpxReader::new();
    reader.open(file).unwrap();
    assert!(reader.user_data().is_none());

    for i in 0..2 {
        let spec = reader.select(i).unwrap();
        assert_eq!(spec.attrs.get_bytes("dpx:UserData"), Some(blob.as_slice()));
    }
    assert_eq!(reader.user_data(), Some(blob.as_slice()));

    // pixel data follows the user data block
    reader.select(0).unwrap();
    assert_eq!(reader.read_scanline(0).unwrap().as_u8().unwrap(), &[1, 2, 3, 4]);
}

#[test]
fn oversized_user_data_is_ignored() {
    let mut file = two_lumas().build();
    // claims 64 KiB of user data in a file that is much shorter
    file[32..36].copy_from_slice(&0x1_0000u32.to_be_bytes());

    let mut reader = DpxReader::new();
    reader.open(file).unwrap();
    let spec = reader.select(0).unwrap();
    assert!(!spec.attrs.contains("dpx:UserData"));
    assert!(reader.user_data().is_none());
    assert_eq!(reader.read_scanline(0).unwrap().as_u8().unwrap(), &[1, 2, 3, 4]);
}

#[test]
fn open_path_selects_first_subimage() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&two_lumas().build()).unwrap();
    tmp.flush().unwrap();

    let mut reader = DpxReader::open_path(tmp.path()).unwrap();
    assert_eq!(reader.state(), ReaderState::SubimageSelected(0));
    assert_eq!(reader.spec().unwrap().attrs.get_i32("oiio:subimages"), Some(2));
    assert_eq!(reader.read_image().unwrap().as_u8().unwrap(), (1..=8).collect::<Vec<u8>>().as_slice());

    reader.select(1).unwrap();
    assert_eq!(reader.read_scanlines(1, 2).unwrap().as_u8().unwrap(), &[15, 16, 17, 18]);
}

#[test]
fn open_path_with_options() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    let file = DpxBuilder::new(Endian::Little, 2, 1)
        .element(Element::new(100, 8, vec![128, 16, 128, 235]))
        .build();
    tmp.write_all(&file).unwrap();
    tmp.flush().unwrap();

    let raw = DpxReader::open_path_with(tmp.path(), DpxReaderOptions::new().with_raw_color(true))
        .unwrap();
    assert_eq!(raw.spec().unwrap().channels, 2);
    let rgb = DpxReader::open_path(tmp.path()).unwrap();
    assert_eq!(rgb.spec().unwrap().channels, 3);
    assert_eq!(rgb.read_image().unwrap().as_u8().unwrap(), &[16, 16, 16, 235, 235, 235]);

    assert!(matches!(
        DpxReader::open_path(tmp.path().with_extension("missing")),
        Err(DpxError::Io(_))
    ));
}

#[test]
fn huge_user_data_size_is_ignored() {
    let mut file = two_lumas().build();
    file[32..36].copy_from_slice(&0xFFFF_FFF0u32.to_be_bytes());

    let mut reader = DpxReader::new();
    reader.open(file).unwrap();
    let spec = reader.select(0).unwrap();
    assert!(!spec.attrs.contains("dpx:UserData"));
    assert!(reader.user_data().is_none());
    assert_eq!(reader.read_image().unwrap().as_u8().unwrap(), (1..=8).collect::<Vec<u8>>().as_slice());
}

/// Element 0 is 7-bit (undecodable), element 1 is 8-bit luma at an explicit offset.
fn unsupported_then_luma() -> Vec<u8> {
    DpxBuilder::new(Endian::Big, 4, 1)
        .element(Element::new(6, 7, vec![1, 2, 3, 4]))
        .element(Element::new(6, 8, vec![9, 8, 7, 6]).offset(2052))
        .build()
}

#[test]
fn later_subimage_readable_when_first_is_unsupported() {
    let mut reader = DpxReader::new();
    reader.open(unsupported_then_luma()).unwrap();
    assert_eq!(reader.subimage_count(), 2);

    assert!(matches!(reader.select(0), Err(DpxError::UnsupportedFormat(_))));
    assert_eq!(reader.state(), ReaderState::HeaderParsed);

    assert_eq!(reader.select(1).unwrap().channel_names, ["Y"]);
    assert_eq!(reader.state(), ReaderState::SubimageSelected(1));
    assert_eq!(reader.read_image().unwrap(), PixelData::U8(vec![9, 8, 7, 6]));

    // a failed select after a good one keeps subimage 1
    assert!(reader.select(0).is_err());
    assert_eq!(reader.current_subimage(), Some(1));
}

#[test]
fn open_path_needs_a_readable_first_subimage() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&unsupported_then_luma()).unwrap();
    tmp.flush().unwrap();

    assert!(matches!(
        DpxReader::open_path(tmp.path()),
        Err(DpxError::UnsupportedFormat(_))
    ));

    let mut reader = DpxReader::with_options(DpxReaderOptions::default());
    reader.open(tmp.reopen().unwrap()).unwrap();
    reader.select(1).unwrap();
    assert_eq!(reader.read_scanline(0).unwrap().as_u8().unwrap(), &[9, 8, 7, 6]);
}
