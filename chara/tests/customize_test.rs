//! End-to-end catalog tests over a synthetic game data fixture. The fixture
//! mirrors the real sheets' shape (32 make-type rows, shared color table,
//! customize rows referenced by id) with recognizable icon ranges per list
//! so that provenance of every record is assertable.

use chara::{
    cmp::CmpFile,
    customize::{
        Clan, CustomName, CustomizeIndex, CustomizeRegistry, CustomizeValue, Gender, MenuType,
        Race,
    },
    excel::Sheet,
    sheets::{
        make_type_row, CharaMakeCustomize, CharaMakeRow, GameData, HairMakeRow, HairSlot,
        LobbyText, Menu, Tribe, FEATURE_SLOTS,
    },
};
use nohash_hasher::IntMap;

const FACE_ROWS: [u32; 4] = [1000, 1001, 1002, 1003];
const HAIR_ROWS: [u32; 5] = [2000, 2001, 2002, 2003, 2004];
const TAIL_ROWS: [u32; 3] = [3000, 3001, 3002];
const PAINT_ROWS: [u32; 3] = [4000, 4001, 4002];
const FUR_ROWS: [u32; 3] = [6000, 6001, 6002];
const HROTH_FACE_ROWS: [u32; 4] = [7000, 7001, 7002, 7003];

fn customize_rows() -> Vec<(u32, CharaMakeCustomize)> {
    let block = |rows: &[u32], icon_base: u32| {
        rows.iter()
            .enumerate()
            .map(|(i, &id)| {
                (
                    id,
                    CharaMakeCustomize {
                        id,
                        feature_id: i as u8 + 1,
                        icon: icon_base + i as u32,
                        data: 0,
                    },
                )
            })
            .collect::<Vec<_>>()
    };

    let mut rows = Vec::new();
    rows.extend(block(&FACE_ROWS, 5000));
    rows.extend(block(&HAIR_ROWS, 5100));
    rows.extend(block(&TAIL_ROWS, 5200));
    rows.extend(block(&PAINT_ROWS, 5300));
    rows.extend(block(&HROTH_FACE_ROWS, 5400));
    rows.extend(block(&FUR_ROWS, 5500));
    rows
}

fn menu(target: CustomizeIndex, menu_type: MenuType, size: u8, values: Vec<u32>) -> Menu {
    Menu {
        id: 0,
        init: 0,
        menu_type,
        target: Some(target),
        size,
        mask: 0,
        values,
    }
}

fn make_row(clan: Clan, gender: Gender) -> CharaMakeRow {
    // A glob of CustomizeIndex would shadow the Race/Gender/Clan types.
    use CustomizeIndex::{
        BustSize, Eyebrows, EyeColorRight, EyeShape, Face, FacePaint, FacePaintColor, Hairstyle,
        HairColor, Height, Jaw, LipColor, Mouth, MuscleMass, Nose, SkinColor, TailShape,
        TattooColor,
    };
    use MenuType::*;

    let hrothgar = clan.race() == Race::Hrothgar;

    let mut face_menu = menu(Face, IconSelector, 4, FACE_ROWS.to_vec());
    face_menu.id = 300;

    let mut menus = vec![
        face_menu,
        menu(Height, Percentage, 100, Vec::new()),
        menu(SkinColor, ColorPicker, 0, Vec::new()),
        menu(EyeColorRight, ColorPicker, 0, Vec::new()),
        menu(HairColor, ColorPicker, 0, Vec::new()),
        menu(TattooColor, ColorPicker, 0, Vec::new()),
        menu(Eyebrows, ListSelector, 6, Vec::new()),
        menu(EyeShape, ListSelector, 4, Vec::new()),
        menu(Nose, ListSelector, 5, Vec::new()),
        menu(Jaw, ListSelector, 3, Vec::new()),
        menu(Mouth, ListSelector, 7, Vec::new()),
        menu(TailShape, IconSelector, 3, TAIL_ROWS.to_vec()),
        menu(FacePaint, IconSelector, 3, PAINT_ROWS.to_vec()),
        menu(FacePaintColor, DoubleColorPicker, 0, Vec::new()),
    ];

    if hrothgar {
        menus.push(menu(Hairstyle, IconSelector, 4, HROTH_FACE_ROWS.to_vec()));
        menus.push(menu(LipColor, IconSelector, 3, FUR_ROWS.to_vec()));
    } else {
        menus.push(menu(LipColor, DoubleColorPicker, 0, Vec::new()));
    }

    if gender == Gender::Female {
        menus.push(menu(BustSize, Percentage, 100, Vec::new()));
    } else {
        menus.push(menu(MuscleMass, Percentage, 100, Vec::new()));
    }

    let feature_icons = (0..8)
        .map(|face| {
            let mut icons = [0u32; FEATURE_SLOTS];
            for (slot, icon) in icons.iter_mut().enumerate() {
                *icon = 9000 + face as u32 * 10 + slot as u32;
            }
            icons
        })
        .collect();

    CharaMakeRow {
        race: clan.race() as u8,
        tribe: clan as u8,
        gender: gender as u8,
        menus,
        feature_icons,
    }
}

fn fixture() -> GameData {
    let mut charamake = IntMap::default();
    let mut hair = IntMap::default();
    for clan in Clan::ALL {
        for gender in Gender::ALL {
            let id = make_type_row(clan as u8, gender == Gender::Female);
            charamake.insert(id, make_row(clan, gender));
            hair.insert(
                id,
                HairMakeRow {
                    slots: HAIR_ROWS
                        .iter()
                        .enumerate()
                        .map(|(i, &row_id)| HairSlot {
                            row_id,
                            // Last hairstyle only fits face 1.
                            face: if i == 4 { 1 } else { 0 },
                        })
                        .collect(),
                },
            );
        }
    }

    let lobby = Sheet::from_rows(
        "Lobby",
        [
            (300, "Visage"),
            (237, "Shining"),
            (1741, "Features"),
            (1742, "Tattoos"),
            (102, "Clan"),
            (103, "Gender"),
            (2135, "Reverse"),
            (2125, "Odd Eyes"),
            (1076, "Small"),
            (1075, "Large"),
        ]
        .map(|(id, text)| {
            (
                id,
                LobbyText {
                    id,
                    text: text.to_string(),
                },
            )
        }),
    );

    let tribe = Sheet::from_rows(
        "Tribe",
        Clan::ALL.map(|clan| {
            (
                clan as u32,
                Tribe {
                    id: clan as u32,
                    masculine: format!("{} (M)", clan.name()),
                    feminine: format!("{} (F)", clan.name()),
                    unk1: 0,
                    unk2: 0,
                },
            )
        }),
    );

    GameData {
        charamake,
        hair,
        customize: Sheet::from_rows("CharaMakeCustomize", customize_rows()),
        lobby,
        tribe,
        // Identity-valued table so that icons reveal the entry offset.
        cmp: CmpFile::from_colors((0..0xAA00).collect()),
    }
}

fn registry() -> CustomizeRegistry {
    CustomizeRegistry::new(&fixture()).unwrap()
}

#[test]
fn counts_follow_availability_in_every_set() {
    let registry = registry();
    assert_eq!(registry.sets().len(), 32);

    for set in registry.sets() {
        for index in CustomizeIndex::ALL {
            let count = set.count(index);
            if set.is_available(index) {
                assert!(
                    count > 0,
                    "{:?}/{:?}: {index:?} available but empty",
                    set.clan(),
                    set.gender()
                );
            } else {
                assert_eq!(
                    count,
                    0,
                    "{:?}/{:?}: {index:?} unavailable but counted",
                    set.clan(),
                    set.gender()
                );
            }
        }
    }
}

#[test]
fn value_resolution_inverts_enumeration() {
    let registry = registry();
    let face = CustomizeValue(1);

    for set in registry.sets() {
        for index in CustomizeIndex::ALL {
            for i in 0..set.count_with_face(index, face) {
                let data = set.data_with_face(index, i, face);
                let resolved = set.data_by_value(index, data.value, face);
                assert_eq!(
                    resolved.map(|(pos, _)| pos),
                    Some(i),
                    "{:?}/{:?}: {index:?} choice {i} (value {}) did not resolve back",
                    set.clan(),
                    set.gender(),
                    data.value
                );
            }
        }
    }
}

#[test]
fn boolean_options_accept_only_zero_and_mask() {
    let registry = registry();
    let set = registry.get(Clan::Midlander, Gender::Male);

    let resolve = |value| {
        set.data_by_value(CustomizeIndex::Highlights, CustomizeValue(value), CustomizeValue::ZERO)
    };
    assert_eq!(resolve(0x00).map(|(i, _)| i), Some(0));
    assert_eq!(resolve(0x80).map(|(i, _)| i), Some(1));
    assert_eq!(resolve(0x40), None);

    // Facial features carry one bit each.
    let feature = set.data_with_face(CustomizeIndex::FacialFeature3, 1, CustomizeValue(2));
    assert_eq!(feature.value, CustomizeValue(0x04));
    assert_eq!(feature.icon, 9010 + 2);
}

#[test]
fn hrothgar_menus_swap_identities() {
    let registry = registry();
    let set = registry.get(Clan::Helion, Gender::Male);

    // Hairstyles enumerate face variants from the hairstyle menu, not the
    // hairstyle sheet.
    assert_eq!(set.hairstyles().len(), HROTH_FACE_ROWS.len());
    assert!(set.hairstyles().iter().all(|d| (5400..5500).contains(&d.icon)));

    // The lip color slot holds fur patterns; there is no light range.
    assert!(set.lip_colors_light().is_empty());
    assert_eq!(set.lip_colors_dark().len(), FUR_ROWS.len());
    assert!(set.lip_colors_dark().iter().all(|d| (5500..5600).contains(&d.icon)));

    // Faces 5..=8 alias 1..=4.
    assert_eq!(
        set.data_by_value(CustomizeIndex::Face, CustomizeValue(5), CustomizeValue::ZERO),
        set.data_by_value(CustomizeIndex::Face, CustomizeValue(1), CustomizeValue::ZERO),
    );

    // Hrothgar females have no skin or hair color data at all.
    let female = registry.get(Clan::Helion, Gender::Female);
    assert!(!female.is_available(CustomizeIndex::SkinColor));
    assert!(!female.is_available(CustomizeIndex::HairColor));
    assert_eq!(female.count(CustomizeIndex::SkinColor), 0);
}

#[test]
fn color_ranges_do_not_overlap() {
    let registry = registry();
    let set = registry.get(Clan::Midlander, Gender::Male);

    // Eye and tattoo colors are one shared range by design; every other
    // pair of color lists must occupy disjoint table entries.
    assert_eq!(set.eye_colors().len(), set.tattoo_colors().len());
    assert!(set
        .eye_colors()
        .iter()
        .zip(set.tattoo_colors())
        .all(|(eye, tattoo)| {
            eye.display_index == tattoo.display_index && eye.icon == tattoo.icon
        }));

    let lists = [
        set.skin_colors(),
        set.hair_colors(),
        set.highlight_colors(),
        set.eye_colors(),
        set.lip_colors_dark(),
        set.lip_colors_light(),
        set.face_paint_colors_dark(),
        set.face_paint_colors_light(),
    ];
    let mut seen = std::collections::HashSet::new();
    for list in lists {
        assert!(!list.is_empty());
        for data in list {
            assert!(
                seen.insert(data.display_index),
                "table entry {} appears in two color ranges",
                data.display_index
            );
        }
    }
}

#[test]
fn canonical_order_groups_available_options() {
    let registry = registry();
    let set = registry.get(Clan::Midlander, Gender::Male);
    let order = set.order();

    use CustomizeIndex::{
        EyeColorLeft, EyeColorRight, FacialFeature1, FacialFeature2, FacialFeature3,
        FacialFeature4, FacialFeature5, FacialFeature6, FacialFeature7, HairColor, Height,
        HighlightsColor, LegacyTattoo, MuscleMass, SkinColor, TattooColor,
    };
    assert_eq!(
        order[&MenuType::ColorPicker],
        vec![SkinColor, TattooColor, HairColor, HighlightsColor, EyeColorLeft, EyeColorRight],
    );
    assert_eq!(order[&MenuType::Percentage], vec![Height, MuscleMass]);
    assert_eq!(
        order[&MenuType::IconCheckmark],
        vec![
            FacialFeature1,
            FacialFeature2,
            FacialFeature3,
            FacialFeature4,
            FacialFeature5,
            FacialFeature6,
            FacialFeature7,
            LegacyTattoo,
        ],
    );

    // Race and gender never appear; every menu type has a group.
    for group in order.values() {
        assert!(!group.contains(&CustomizeIndex::Race));
        assert!(!group.contains(&CustomizeIndex::Gender));
    }
    for menu_type in MenuType::ALL {
        assert!(order.contains_key(&menu_type));
    }
}

#[test]
fn midlander_male_catalog_details() {
    let registry = registry();
    let set = registry.get(Clan::Midlander, Gender::Male);

    // Hairstyles resolve through the stored list even though no menu
    // declares them for this race.
    assert_eq!(set.menu_type(CustomizeIndex::Hairstyle), MenuType::IconSelector);
    let hair = set.data(CustomizeIndex::Hairstyle, 0);
    assert_eq!(hair.icon, 5100);
    assert_eq!(hair.value, CustomizeValue(1));

    assert_eq!(set.count(CustomizeIndex::BustSize), 0);
    assert_eq!(
        registry.get(Clan::Midlander, Gender::Female).count(CustomizeIndex::BustSize),
        101,
    );

    assert_eq!(set.option_name(CustomizeIndex::Face), "Visage");
    assert_eq!(set.option_name(CustomizeIndex::Highlights), "Shining");
    assert_eq!(set.option_name(CustomizeIndex::FacialFeature3), "Features & Tattoos");
    // No lobby row was declared for this menu; the fallback name applies.
    assert_eq!(set.option_name(CustomizeIndex::Nose), "Nose");

    assert_eq!(set.skin_colors()[0].display_index, 0x1200);
    assert_eq!(set.hair_colors()[0].display_index, 0x1300);
    assert_eq!(set.data(CustomizeIndex::LegacyTattoo, 1).icon, 137905);
}

#[test]
fn hair_restricted_to_a_face_resolves_only_there() {
    let registry = registry();
    let set = registry.get(Clan::Midlander, Gender::Male);
    let restricted = CustomizeValue(5); // feature id of the face-1-only style

    assert!(set
        .data_by_value(CustomizeIndex::Hairstyle, restricted, CustomizeValue(1))
        .is_some());
    assert!(set
        .data_by_value(CustomizeIndex::Hairstyle, restricted, CustomizeValue(2))
        .is_none());

    // Face context 0 and out-of-range faces see the unrestricted full list.
    assert_eq!(set.count_with_face(CustomizeIndex::Hairstyle, CustomizeValue::ZERO), 5);
    assert_eq!(set.count_with_face(CustomizeIndex::Hairstyle, CustomizeValue(99)), 5);
    assert_eq!(set.count_with_face(CustomizeIndex::Hairstyle, CustomizeValue(2)), 4);
}

#[test]
fn name_table_resolves_shared_labels() {
    let registry = registry();
    let names = registry.names();

    assert_eq!(names.get(CustomName::OddEyes), "Odd Eyes");
    assert_eq!(names.get(CustomName::Reverse), "Reverse");
    assert_eq!(names.clan_name(Clan::Midlander, Gender::Female), "Midlander (F)");
    assert_eq!(names.clan_name(Clan::Veena, Gender::Male), "Veena (M)");
}

#[test]
#[should_panic(expected = "out of range")]
fn out_of_range_choice_panics() {
    let registry = registry();
    let set = registry.get(Clan::Midlander, Gender::Male);
    set.data(CustomizeIndex::Face, 99);
}

#[test]
#[should_panic(expected = "invalid customization requested")]
fn unknown_clan_lookup_panics() {
    registry().get(Clan::Unknown, Gender::Male);
}
