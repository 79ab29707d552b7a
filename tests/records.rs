use astval::{
    avec::{self, DecodedRecord, FromFields, Options, slice::Error},
    sans::field::Located,
    schema::{Catalog, FieldSpec, Schema},
};

/// A schema of seven items, the first described by `first`.
fn padded(first: FieldSpec) -> Schema {
    (1..7).fold(Schema::new().with("I0", first), |s, i| {
        s.with(format!("I{i}"), FieldSpec::Fixed { length: 1 })
    })
}

fn catalog(category: u8, schema: Schema) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(category, schema);
    catalog
}

fn plot_catalog() -> Catalog {
    let plot = Schema::new()
        .with("I048/010", FieldSpec::Fixed { length: 2 })
        .with("I048/140", FieldSpec::Fixed { length: 3 })
        .with("I048/020", FieldSpec::Fixed { length: 1 })
        .with("I048/040", FieldSpec::Fixed { length: 4 })
        .with("I048/070", FieldSpec::Fixed { length: 2 })
        .with("I048/090", FieldSpec::Fixed { length: 2 })
        .with(
            "I048/130",
            FieldSpec::Compound {
                subfields: ["SRL", "SRR", "SAM", "PRL", "PAM", "RPD", "APD"]
                    .into_iter()
                    .fold(Schema::new(), |s, n| s.with(n, FieldSpec::Fixed { length: 1 })),
            },
        )
        .with("I048/220", FieldSpec::Fixed { length: 3 })
        .with("I048/240", FieldSpec::Fixed { length: 6 })
        .with("I048/250", FieldSpec::Rep { length: 8 })
        .with("I048/161", FieldSpec::Fixed { length: 2 })
        .with("I048/042", FieldSpec::Fixed { length: 4 })
        .with("I048/SP", FieldSpec::Spf)
        .with("I048/RE", FieldSpec::Ref);

    catalog(48, plot)
}

const PLOT: [u8; 38] = [
    0x30, 0x00, 0x26, 0xD3, 0x24, // header, FSPEC
    0x19, 0xC9, // I048/010
    0x35, 0x6D, 0x4D, // I048/140
    0x01, 0x02, 0x03, 0x04, // I048/040
    0x90, 0x05, 0x0A, // I048/130
    0x02, 0x60, 0x00, 0x80, 0x00, 0x4A, 0x00, 0x00, 0x00, // I048/250
    0x40, 0x19, 0xAF, 0x4A, 0x00, 0x00, 0x00, 0x00, //
    0x03, 0xAA, 0xBB, 0xCC, // I048/SP
];

#[test]
fn decode_record_plot() {
    let record = avec::slice::decode_record(&PLOT, &plot_catalog()).unwrap();

    assert_eq!(record.category, 48);
    assert_eq!(record.length, 38);

    let names: Vec<&str> = record.items.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        ["I048/010", "I048/140", "I048/040", "I048/130", "I048/250", "I048/SP"]
    );

    let time = record.item("I048/140").unwrap();
    assert_eq!((time.index, time.offset), (1, 7));
    assert_eq!(time.data, [0x35, 0x6D, 0x4D]);

    let characteristics = record.item("I048/130").unwrap();
    assert_eq!(characteristics.kind, "Compound");
    assert_eq!(characteristics.data, [0x90, 0x05, 0x0A]);
    assert_eq!(characteristics.subfields.len(), 2);
    assert_eq!(characteristics.subfield("PRL").unwrap().data, [0x0A]);
    assert_eq!(characteristics.subfield("PRL").unwrap().offset, 16);
    assert!(characteristics.subfield("SRR").is_none());

    assert_eq!(record.item("I048/250").unwrap().data.len(), 17);
    assert_eq!(record.item("I048/SP").unwrap().data, [0x03, 0xAA, 0xBB, 0xCC]);
    assert!(record.item("I048/RE").is_none());
}

#[test]
fn empty_schema_never_matches_an_fspec() {
    let catalog = catalog(1, Schema::new());
    let err = avec::decode_slice(&[1, 0x00, 0x04, 0x00], &catalog, &mut ()).unwrap_err();
    assert!(matches!(
        err,
        Error::FspecSchemaMismatch {
            fspec_items: 7,
            schema_items: 0
        }
    ));
}

#[test]
fn trailing_bytes_are_rejected_by_default() {
    let catalog = catalog(2, padded(FieldSpec::Fixed { length: 2 }));
    let record = [2, 0x00, 0x06, 0x00, 0xAB, 0xCD];

    let err = avec::decode_slice(&record, &catalog, &mut ()).unwrap_err();
    assert!(matches!(
        err,
        Error::Incomplete {
            cursor: 4,
            declared: 6
        }
    ));
}

#[test]
fn trailing_bytes_are_tolerated_when_lenient() {
    let catalog = catalog(2, padded(FieldSpec::Fixed { length: 2 }));
    let record = [2, 0x00, 0x06, 0x00, 0xAB, 0xCD];

    let options = Options {
        exact_length: false,
    };
    let position = avec::slice::decode_with(&record, &catalog, &mut (), options).unwrap();
    assert_eq!(position, 4);
}

#[test]
fn length_mismatch_stops_decoding() {
    let catalog = catalog(1, padded(FieldSpec::Fixed { length: 1 }));
    let mut record = DecodedRecord::default();

    let err = avec::decode_slice(&[1, 0x00, 0x09, 0x00], &catalog, &mut record).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            declared: 9,
            actual: 4
        }
    ));
    assert_eq!(record, DecodedRecord::default());
}

#[test]
fn repetitive_item_consumes_count_times_length() {
    let catalog = catalog(3, padded(FieldSpec::Rep { length: 3 }));
    let record = [3, 0x00, 0x0B, 0x80, 2, 1, 2, 3, 4, 5, 6];

    let decoded = avec::slice::decode_record(&record, &catalog).unwrap();
    assert_eq!(decoded.items.len(), 1);
    assert_eq!(decoded.items[0].offset, 4);
    assert_eq!(decoded.items[0].data.len(), 7);
}

#[test]
fn unknown_category_is_rejected() {
    let catalog = catalog(1, padded(FieldSpec::Spf));
    let err = avec::decode_slice(&[9, 0x00, 0x04, 0x00], &catalog, &mut ()).unwrap_err();
    assert!(matches!(err, Error::UnknownCategory(9)));
}

#[test]
fn short_record_is_rejected() {
    let err = avec::decode_slice(&[1, 0x00], &Catalog::new(), &mut ()).unwrap_err();
    assert!(matches!(err, Error::Truncated(2)));
}

#[test]
fn unterminated_fspec_is_out_of_bounds() {
    let catalog = catalog(1, padded(FieldSpec::Spf));
    let err = avec::decode_slice(&[1, 0x00, 0x05, 0x01, 0x01], &catalog, &mut ()).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { ref item, .. } if item == "FSPEC"));
}

#[test]
fn truncated_item_is_out_of_bounds() {
    let catalog = catalog(1, padded(FieldSpec::Fixed { length: 4 }));
    let err = avec::decode_slice(&[1, 0x00, 0x06, 0x80, 1, 2], &catalog, &mut ()).unwrap_err();

    let Error::OutOfBounds { item, source } = err else {
        panic!("expected an out of bounds error");
    };
    assert_eq!(item, "I0");
    assert_eq!((source.offset, source.len, source.available), (4, 4, 6));
}

#[test]
fn fields_decoded_before_a_failure_are_kept() {
    let schema = Schema::new()
        .with("A", FieldSpec::Fixed { length: 1 })
        .with("B", FieldSpec::Spf);
    let schema = (2..7).fold(schema, |s, i| s.with(format!("I{i}"), FieldSpec::Ref));
    let catalog = catalog(5, schema);
    let mut record = DecodedRecord::default();

    let err = avec::decode_slice(&[5, 0x00, 0x06, 0xC0, 0x11, 0x09], &catalog, &mut record);
    assert!(matches!(err, Err(Error::OutOfBounds { ref item, .. }) if item == "B"));
    assert_eq!(record.items.len(), 1);
    assert_eq!(record.items[0].name, "A");
}

#[test]
fn decoded_record_is_reusable_after_a_failure() {
    // I048/130 present; its SRL subfield is located before SRR runs out.
    let broken = [48, 0x00, 0x07, 0x03, 0x00, 0xC0, 0x11];
    let catalog = plot_catalog();
    let mut record = DecodedRecord::default();

    let err = avec::decode_slice(&broken, &catalog, &mut record).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { ref item, .. } if item == "I048/130"));

    avec::decode_slice(&PLOT, &catalog, &mut record).unwrap();
    assert_eq!(record, avec::slice::decode_record(&PLOT, &catalog).unwrap());
    assert_eq!(record.item("I048/130").unwrap().subfields.len(), 2);
}

#[test]
fn cursor_only_moves_forward() {
    struct Monotonic {
        length: usize,
        end: usize,
    }

    impl FromFields for Monotonic {
        fn add_header(&mut self, _: u8, length: usize) {
            self.length = length;
        }

        fn add_field(&mut self, field: &Located<'_>) {
            if field.depth == 0 {
                assert!(field.offset >= self.end);
                assert!(!field.bytes.is_empty());
                self.end = field.offset + field.bytes.len();
                assert!(self.end <= self.length);
            }
        }
    }

    let mut monotonic = Monotonic { length: 0, end: 0 };
    avec::decode_slice(&PLOT, &plot_catalog(), &mut monotonic).unwrap();
    assert_eq!(monotonic.end, PLOT.len());
}

#[test]
fn catalog_is_shared_between_threads() {
    let catalog = plot_catalog();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| avec::decode_slice(&PLOT, &catalog, &mut ()).unwrap()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), PLOT.len());
        }
    });
}
