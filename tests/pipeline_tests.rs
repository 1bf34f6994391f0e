//! End-to-end pipeline tests over the library API.

use platecad::geometry::surface_area;
use platecad::Sheet;

/// The numpad scenario: five rows, sandwich case, four mount holes, USB slot
/// and filleted corners.
const NUMPAD_CONFIG: &str = r#"{
    "switch-type": 3,
    "stab-type": 1,
    "layout": [
        ["Num Lock", "/", "*", "-"],
        ["7", "8", "9", {"h": 2}, "+"],
        ["4", "5", "6"],
        ["1", "2", "3", {"h": 2}, "Enter"],
        [{"w": 2}, "0", "."]
    ],
    "case": {
        "case-type": "sandwich",
        "usb-location": 100,
        "usb-width": 12,
        "mount-holes-num": 4,
        "mount-holes-size": 3,
        "mount-holes-edge": 6
    },
    "top-padding": 9,
    "left-padding": 9,
    "right-padding": 9,
    "bottom-padding": 9,
    "fillet": 3
}"#;

#[test]
fn test_numpad_sandwich_produces_five_plates() {
    let mut sheet = Sheet::from_json(NUMPAD_CONFIG).unwrap();
    sheet.generate().unwrap();

    assert_eq!(
        sheet.result.plates,
        vec!["switch", "open", "closed", "top", "bottom"]
    );
    // All plates share the outer dimensions.
    let switch = &sheet.result.details["switch"];
    assert!(switch.width > 4.0 * 19.05 && switch.height > 5.0 * 19.05);
    for plate in &sheet.result.plates {
        let details = &sheet.result.details[plate];
        assert!((details.width - switch.width).abs() < 1e-9, "plate {plate}");
        assert!((details.height - switch.height).abs() < 1e-9, "plate {plate}");
        assert!(!sheet.layers[plate.as_str()].errored);
        assert!(!sheet.layers[plate.as_str()].keep_polys.is_empty());
        assert!(details.area > 0.0);
    }
    // The bottom plate has only the outline and the four mount holes:
    // one outer ring plus four hole rings.
    assert_eq!(sheet.layers["bottom"].keep_polys.len(), 5);
}

#[test]
fn test_numpad_mount_holes_symmetric() {
    let mut sheet = Sheet::from_json(NUMPAD_CONFIG).unwrap();
    sheet.generate().unwrap();
    // Hole rings on the bottom plate (every ring but the outline) pair up
    // symmetrically about the case centre.
    let bottom = &sheet.layers["bottom"];
    let outline_idx = bottom
        .keep_polys
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            surface_area(std::slice::from_ref(*a))
                .total_cmp(&surface_area(std::slice::from_ref(*b)))
        })
        .map(|(i, _)| i)
        .unwrap();
    let centers: Vec<(f64, f64)> = bottom
        .keep_polys
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != outline_idx)
        .map(|(_, ring)| {
            let n = ring.len() as f64;
            let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            (sx / n, sy / n)
        })
        .collect();
    assert_eq!(centers.len(), 4);
    let cx = sheet.case_center.x;
    let cy = sheet.case_center.y;
    for &(x, y) in &centers {
        let has_mirror = centers.iter().any(|&(mx, my)| {
            (mx - (2.0 * cx - x)).abs() < 0.01 && (my - (2.0 * cy - y)).abs() < 0.01
        });
        assert!(has_mirror, "hole at ({x:.3}, {y:.3}) lacks a mirror");
    }
}

#[test]
fn test_switch_and_stab_template_grid() {
    // Every switch template against every stab template, mirroring the
    // original coverage matrix. Each run must seal without layer errors.
    for switch in 1..=4 {
        let layout = format!(
            r#"[[{{"_t":{switch}}},"", {{"_t":{switch},"w":2,"_s":0}},"", {{"_t":{switch},"w":2,"_s":1}},"",
                 {{"_t":{switch},"w":2,"_s":2}},"", {{"_t":{switch},"w":2,"_s":3}},"", {{"_t":{switch},"w":2,"_s":4}},"",
                 {{"_t":{switch},"w":2,"_s":5}},""]]"#
        );
        let mut sheet = Sheet::from_json(&format!(r#"{{"layout":{layout}}}"#)).unwrap();
        sheet.generate().unwrap();
        let layer = &sheet.layers["switch"];
        assert!(!layer.errored, "switch type {switch}");
        assert!(!layer.keep_polys.is_empty());
    }
}

#[test]
fn test_cherry_stab_size_coverage() {
    // Every size in the Cherry table, the way the original exercised them.
    let config = r#"{
        "layout": [
            [{"w":2},"", {"w":10},""],
            [{"w":3},"", {"w":9},""],
            [{"w":4},"", {"w":8},""],
            [{"w":2.25},"", {"w":2.75},"", {"w":7},""],
            [{"w":5.5},"", {"w":6.5},""],
            [{"w":1.25},"", {"w":4.5},"", {"w":6.25},""],
            [{"w":6},"", {"w":6},""]
        ]}"#;
    let mut sheet = Sheet::from_json(config).unwrap();
    sheet.generate().unwrap();
    assert!(!sheet.layers["switch"].errored);
}

#[test]
fn test_alps_fallback_sizes() {
    let config = r#"{
        "switch-type": 4,
        "stab-type": 4,
        "layout": [
            [{"w":1.5},"", {"w":6.5},""],
            [{"w":1.75},"", {"w":6.25},""],
            [{"w":1},"", {"w":2},"", {"w":2.25},"", {"w":2.75},""]
        ]}"#;
    let mut sheet = Sheet::from_json(config).unwrap();
    sheet.generate().unwrap();
    assert!(!sheet.layers["switch"].errored);
}

#[test]
fn test_kailh_choc_sizes() {
    let config = r#"{"switch-type":1,"stab-type":5,"layout":[[{"w":2},"", {"w":6.25},""]]}"#;
    let mut sheet = Sheet::from_json(config).unwrap();
    sheet.generate().unwrap();
    assert!(!sheet.layers["switch"].errored);
}

#[test]
fn test_connected_stabs_blanks_middle_band() {
    let separate = r#"{"stab-type":2,"layout":[[{"w":6.25},""]]}"#;
    let connected = r#"{"stab-type":2,"connected-stabs":true,"layout":[[{"w":6.25},""]]}"#;
    let mut a = Sheet::from_json(separate).unwrap();
    a.generate().unwrap();
    let mut b = Sheet::from_json(connected).unwrap();
    b.generate().unwrap();
    let area_separate = surface_area(&a.layers["switch"].keep_polys);
    let area_connected = surface_area(&b.layers["switch"].keep_polys);
    // The bridging band removes extra material.
    assert!(area_connected < area_separate - 100.0);
}

#[test]
fn test_layout_override_map_drives_geometry() {
    // Settings carried in the layout's leading map instead of the config.
    let config = r#"{"layout":[
        {"switch-type":1, "kerf":0.0, "left-padding":5, "right-padding":5,
         "top-padding":5, "bottom-padding":5},
        ["A","B"]
    ]}"#;
    let mut sheet = Sheet::from_json(config).unwrap();
    sheet.generate().unwrap();
    let details = &sheet.result.details["switch"];
    // Two 1u keys plus the paddings.
    assert!((details.width - (2.0 * 19.05 + 10.0)).abs() < 0.01);
    // Plain MX squares cut: outline ring plus two 4-vertex rings.
    let cut_rings: Vec<_> = sheet.layers["switch"]
        .keep_polys
        .iter()
        .filter(|p| p.len() == 4 && surface_area(std::slice::from_ref(*p)) < 500.0)
        .collect();
    assert_eq!(cut_rings.len(), 2);
}

#[test]
fn test_run_twice_identical() {
    let mut a = Sheet::from_json(NUMPAD_CONFIG).unwrap();
    a.generate().unwrap();
    let mut b = Sheet::from_json(NUMPAD_CONFIG).unwrap();
    b.generate().unwrap();
    for plate in &a.result.plates {
        assert_eq!(a.layers[plate.as_str()].keep_polys, b.layers[plate.as_str()].keep_polys);
    }
}
