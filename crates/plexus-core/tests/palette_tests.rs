// Host-side tests for palette validation, hex parsing and presets.

use plexus_core::*;

#[test]
fn every_preset_is_valid_and_round_trips_its_name() {
    for preset in Preset::ALL {
        let config = preset.config();
        assert_eq!(config.validate(), Ok(()), "{} failed validation", preset.name());
        assert_eq!(Preset::from_name(preset.name()), Ok(preset));
    }
}

#[test]
fn preset_names_accept_aliases_and_reject_unknown() {
    assert_eq!(Preset::from_name("space_journey"), Ok(Preset::SpaceJourney));
    assert_eq!(Preset::from_name("Journey"), Ok(Preset::SpaceJourney));
    assert_eq!(Preset::from_name(" HERO "), Ok(Preset::Hero));
    assert_eq!(
        Preset::from_name("ocean"),
        Err(PaletteError::UnknownPreset("ocean".into()))
    );
}

#[test]
fn hex_colors_parse_with_or_without_hash() {
    let c = Rgb::from_hex("#ff8000").expect("valid hex");
    assert!((c.r - 1.0).abs() < 1e-6);
    assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(c.b, 0.0);
    assert_eq!(Rgb::from_hex("00FF00"), Ok(Rgb::new(0.0, 1.0, 0.0)));
}

#[test]
fn malformed_hex_is_rejected() {
    for bad in ["#12345", "#1234567", "zzzzzz", "#ééé", "", "#+f+f+f", "-1-1-1"] {
        assert!(
            matches!(Rgb::from_hex(bad), Err(PaletteError::InvalidHex(_))),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn color_set_from_hex_requires_both_lists() {
    let ok = ColorSet::from_hex(&["#3d85ff", "#4dd9f2"], &["#ffffff"], "#05070f");
    assert!(ok.is_ok());
    assert_eq!(
        ColorSet::from_hex(&[], &["#ffffff"], "#000000"),
        Err(PaletteError::EmptyColors("base"))
    );
    assert_eq!(
        ColorSet::from_hex(&["#ffffff"], &[], "#000000"),
        Err(PaletteError::EmptyColors("accent"))
    );
}

#[test]
fn structural_fields_are_validated() {
    let base = PaletteConfig::default();

    let cfg = PaletteConfig { node_count: 0, ..base.clone() };
    assert_eq!(cfg.validate(), Err(PaletteError::ZeroCount { field: "node_count" }));

    let cfg = PaletteConfig { node_count: MAX_NODES + 1, ..base.clone() };
    assert_eq!(cfg.validate(), Err(PaletteError::TooManyNodes(MAX_NODES + 1)));

    let cfg = PaletteConfig { cluster_count: 0, ..base.clone() };
    assert!(matches!(cfg.validate(), Err(PaletteError::ZeroCount { .. })));

    let cfg = PaletteConfig { node_count: 10, cluster_count: 60_000, ..base.clone() };
    assert_eq!(
        cfg.validate(),
        Err(PaletteError::TooManyClusters { clusters: 60_000, nodes: 10 })
    );
    let cfg = PaletteConfig { node_count: 6, cluster_count: 6, ..base.clone() };
    assert_eq!(cfg.validate(), Ok(()));

    let cfg = PaletteConfig { slack_radius: -0.1, ..base.clone() };
    assert!(matches!(cfg.validate(), Err(PaletteError::NonPositive { field: "slack_radius", .. })));

    let cfg = PaletteConfig { max_edge_distance: f32::NAN, ..base.clone() };
    assert!(matches!(cfg.validate(), Err(PaletteError::NonPositive { .. })));

    let cfg = PaletteConfig { intra_cluster_keep: 1.5, ..base.clone() };
    assert!(matches!(cfg.validate(), Err(PaletteError::InvalidProbability { .. })));

    let cfg = PaletteConfig { pulse_speed: (1.0, 0.5), ..base.clone() };
    assert!(matches!(cfg.validate(), Err(PaletteError::InvalidRange { field: "pulse_speed", .. })));

    // zero pulses is a valid, inert configuration
    let cfg = PaletteConfig { pulse_count: 0, ..base };
    assert_eq!(cfg.validate(), Ok(()));
}

#[test]
fn with_colors_keeps_structure() {
    let hero = Preset::Hero.config();
    let colors = ColorSet {
        base: vec![Rgb::WHITE],
        accents: vec![Rgb::new(1.0, 0.0, 0.0)],
        background: Rgb::new(0.0, 0.0, 0.0),
    };
    let tinted = hero.with_colors(colors.clone());
    assert_eq!(tinted.colors, colors);
    assert!(hero.same_structure(&tinted));

    let denser = PaletteConfig { node_count: 200, ..tinted };
    assert!(!hero.same_structure(&denser));
}

#[test]
fn cluster_colors_cycle_through_the_base_list() {
    let colors = ColorSet {
        base: vec![Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0)],
        accents: vec![Rgb::WHITE],
        background: Rgb::new(0.0, 0.0, 0.0),
    };
    assert_eq!(colors.cluster_color(0), colors.base[0]);
    assert_eq!(colors.cluster_color(1), colors.base[1]);
    assert_eq!(colors.cluster_color(4), colors.base[0]);
}

#[test]
fn geometry_detail_scales_segments_and_degree() {
    use GeometryDetail::*;
    assert!(Low.disc_segments() < Medium.disc_segments());
    assert!(Medium.disc_segments() < High.disc_segments());
    assert!(Low.max_degree() < High.max_degree());
}
