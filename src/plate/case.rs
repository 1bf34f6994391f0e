//! Mounting-hole placement for the supported case styles.

use crate::geometry::{circle_polygon, round_rectangle_polygon, Path, Point};
use crate::models::case::SWITCH_LAYER;
use crate::models::CaseType;

use super::sheet::Sheet;

/// Emits the mounting holes (and Poker side slots) for the sheet's case
/// style into the affected layers' cut sets.
pub(crate) fn draw_holes(sheet: &mut Sheet) {
    match sheet.case.case_type {
        CaseType::None => {}
        CaseType::Poker => {
            let radius = sheet.case.hole_diameter / 2.0 - sheet.kerf_half;
            for point in poker_holes(sheet).iter().copied().collect::<Vec<_>>() {
                sheet.push_cut(SWITCH_LAYER, circle_polygon(point.x, point.y, radius, 5));
            }
            if !sheet.case.remove_poker_slots {
                // The two side slots: rounded rectangles reaching in from
                // the plate edges at the Poker's screw height.
                let depth = 6.0 - sheet.kerf_half;
                let sc = sheet.width / 2.0 - (depth - sheet.case.hole_diameter / 2.0) / 2.0;
                let mut slots = Path::from(vec![(sc, 9.2), (-sc, 9.2)]);
                slots.translate(sheet.case_center);
                for center in slots.iter().copied().collect::<Vec<_>>() {
                    let slot = round_rectangle_polygon(
                        center.x,
                        center.y,
                        depth + sheet.case.hole_diameter / 2.0,
                        sheet.case.hole_diameter - sheet.kerf_half * 2.0,
                        sheet.case.hole_diameter / 2.0 - sheet.kerf_half - 0.001,
                        5,
                    );
                    sheet.push_cut(SWITCH_LAYER, slot);
                }
            }
        }
        CaseType::Sandwich => {
            let points = sandwich_holes(sheet);
            let radius = sheet.case.hole_diameter / 2.0 - sheet.kerf_half;
            let plates = sheet.result.plates.clone();
            for layer in &plates {
                for point in points.iter() {
                    sheet.push_cut(layer, circle_polygon(point.x, point.y, radius, 5));
                }
            }
        }
    }
}

/// The four fixed Poker hole centres, translated to the case centre.
pub(crate) fn poker_holes(sheet: &Sheet) -> Path {
    let mut points = Path::from(vec![
        (-117.3, -19.4),
        (-14.3, 0.0),
        (48.0, 37.9),
        (117.55, -19.4),
    ]);
    points.translate(sheet.case_center);
    points
}

/// Sandwich hole centres: at least four and an even count, walked clockwise
/// around the edge band from the top-left corner. Extra holes beyond the
/// corner four go to whichever axis currently has the larger per-interval
/// gap, the longer axis on ties.
pub(crate) fn sandwich_holes(sheet: &Sheet) -> Path {
    let mut points = Path::default();
    let case = &sheet.case;
    if case.holes < 4 || case.holes % 2 != 0 {
        return points;
    }
    let kerf = sheet.kerf_half;
    let edge = case.edge_width;
    let all_edges = case.top_width == edge
        && case.bottom_width == edge
        && case.left_width == edge
        && case.right_width == edge;
    let top_bottom = case.top_width == edge && case.bottom_width == edge;
    let left_right = case.left_width == edge && case.right_width == edge;

    if all_edges {
        let x_len = sheet.width - edge - kerf;
        let y_len = sheet.height - edge - kerf;
        let mut x_num = 0.0;
        let mut y_num = 0.0;
        for _ in 0..((case.holes - 4) / 2) {
            let x_gap = x_len / (x_num + 1.0);
            let y_gap = y_len / (y_num + 1.0);
            if x_gap > y_gap {
                x_num += 1.0;
            } else if y_gap > x_gap {
                y_num += 1.0;
            } else if x_len >= y_len {
                x_num += 1.0;
            } else {
                y_num += 1.0;
            }
        }
        let x_gap = (x_len - kerf) / (x_num + 1.0);
        let y_gap = (y_len - kerf) / (y_num + 1.0);
        let mut p = Point::new(sheet.dmz + edge / 2.0 + kerf, sheet.dmz + edge / 2.0 + kerf);
        for _ in 0..(x_num as usize + 1) {
            p.x += x_gap;
            points.0.push(p);
        }
        for _ in 0..(y_num as usize + 1) {
            p.y += y_gap;
            points.0.push(p);
        }
        for _ in 0..(x_num as usize + 1) {
            p.x -= x_gap;
            points.0.push(p);
        }
        for _ in 0..(y_num as usize + 1) {
            p.y -= y_gap;
            points.0.push(p);
        }
    } else if top_bottom {
        let x_len = sheet.width - edge - kerf;
        let x_num = ((case.holes - 4) / 2) as f64;
        let x_gap = (x_len - kerf) / (x_num + 1.0);
        let mut p = Point::new(sheet.dmz + edge / 2.0 + kerf, sheet.dmz + edge / 2.0 + kerf);
        points.0.push(p);
        for _ in 0..(x_num as usize + 1) {
            p.x += x_gap;
            points.0.push(p);
        }
        let mut p = Point::new(
            sheet.dmz + edge / 2.0 + kerf,
            sheet.dmz + sheet.height - edge / 2.0 - kerf,
        );
        points.0.push(p);
        for _ in 0..(x_num as usize + 1) {
            p.x += x_gap;
            points.0.push(p);
        }
    } else if left_right {
        let y_len = sheet.height - edge - kerf;
        let y_num = ((case.holes - 4) / 2) as f64;
        let y_gap = (y_len - kerf) / (y_num + 1.0);
        let mut p = Point::new(sheet.dmz + edge / 2.0 + kerf, sheet.dmz + edge / 2.0 + kerf);
        points.0.push(p);
        for _ in 0..(y_num as usize + 1) {
            p.y += y_gap;
            points.0.push(p);
        }
        let mut p = Point::new(
            sheet.dmz + sheet.width - edge / 2.0 - kerf,
            sheet.dmz + edge / 2.0 + kerf,
        );
        points.0.push(p);
        for _ in 0..(y_num as usize + 1) {
            p.y += y_gap;
            points.0.push(p);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sheet shaped like a finished walk: dimensions and edge widths set.
    fn sized_sheet(width: f64, height: f64, edge: f64) -> Sheet {
        let mut sheet = Sheet::default();
        sheet.width = width;
        sheet.height = height;
        sheet.case.edge_width = edge;
        sheet.case.left_width = edge;
        sheet.case.right_width = edge;
        sheet.case.top_width = edge;
        sheet.case.bottom_width = edge;
        sheet.case_center = Point::new(sheet.dmz + width / 2.0, sheet.dmz + height / 2.0);
        sheet
    }

    #[test]
    fn test_sandwich_rejects_odd_or_few_holes() {
        let mut sheet = sized_sheet(200.0, 100.0, 6.0);
        sheet.case.holes = 3;
        assert!(sandwich_holes(&sheet).is_empty());
        sheet.case.holes = 5;
        assert!(sandwich_holes(&sheet).is_empty());
        sheet.case.holes = 2;
        assert!(sandwich_holes(&sheet).is_empty());
    }

    #[test]
    fn test_sandwich_four_holes_sit_in_corners() {
        let mut sheet = sized_sheet(200.0, 100.0, 6.0);
        sheet.case.holes = 4;
        let points = sandwich_holes(&sheet);
        assert_eq!(points.len(), 4);
        // Symmetric about the case centre.
        let cx = sheet.case_center.x;
        let cy = sheet.case_center.y;
        for p in points.iter() {
            let mirrored = points
                .iter()
                .any(|q| (q.x - (2.0 * cx - p.x)).abs() < 1e-9 && (q.y - (2.0 * cy - p.y)).abs() < 1e-9);
            assert!(mirrored, "hole at ({}, {}) has no mirror", p.x, p.y);
        }
    }

    #[test]
    fn test_sandwich_hole_count_matches_request() {
        for count in [4_i64, 6, 8, 10, 12] {
            let mut sheet = sized_sheet(250.0, 120.0, 6.0);
            sheet.case.holes = count;
            let points = sandwich_holes(&sheet);
            assert_eq!(points.len(), count as usize, "requested {count}");
        }
    }

    #[test]
    fn test_sandwich_extra_holes_prefer_longer_axis() {
        let mut sheet = sized_sheet(300.0, 100.0, 6.0);
        sheet.case.holes = 6;
        let points = sandwich_holes(&sheet);
        assert_eq!(points.len(), 6);
        // The two extra holes split the long (x) runs: three distinct x
        // positions on top and bottom rows, one y pair on each side.
        let top_y = points.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        let top_row: Vec<_> = points.iter().filter(|p| (p.y - top_y).abs() < 1e-9).collect();
        assert_eq!(top_row.len(), 3);
    }

    #[test]
    fn test_sandwich_top_bottom_only() {
        // Narrow left/right paddings: only top and bottom bands match the
        // edge width.
        let mut sheet = sized_sheet(250.0, 120.0, 6.0);
        sheet.case.left_width = 3.0;
        sheet.case.right_width = 3.0;
        sheet.case.holes = 8;
        let points = sandwich_holes(&sheet);
        assert_eq!(points.len(), 8);
        // Two rows of four.
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let distinct = {
            let mut v = ys.clone();
            v.sort_by(f64::total_cmp);
            v.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
            v.len()
        };
        assert_eq!(distinct, 2);
    }

    #[test]
    fn test_sandwich_left_right_only() {
        let mut sheet = sized_sheet(250.0, 120.0, 6.0);
        sheet.case.top_width = 3.0;
        sheet.case.bottom_width = 3.0;
        sheet.case.holes = 8;
        let points = sandwich_holes(&sheet);
        assert_eq!(points.len(), 8);
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let distinct = {
            let mut v = xs.clone();
            v.sort_by(f64::total_cmp);
            v.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
            v.len()
        };
        assert_eq!(distinct, 2);
    }

    #[test]
    fn test_poker_holes_translate_to_case_center() {
        let sheet = sized_sheet(300.0, 100.0, 0.0);
        let points = poker_holes(&sheet);
        assert_eq!(points.len(), 4);
        assert!((points.0[1].x - (sheet.case_center.x - 14.3)).abs() < 1e-9);
        assert!((points.0[1].y - sheet.case_center.y).abs() < 1e-9);
    }

    #[test]
    fn test_poker_case_emits_holes_and_slots() {
        let mut sheet = sized_sheet(300.0, 100.0, 0.0);
        sheet.case.case_type = CaseType::Poker;
        sheet.case.hole_diameter = 3.0;
        sheet.init_layers();
        draw_holes(&mut sheet);
        // Four screw holes plus two side slots.
        assert_eq!(sheet.layers[SWITCH_LAYER].cut_polys.len(), 6);

        let mut sheet = sized_sheet(300.0, 100.0, 0.0);
        sheet.case.case_type = CaseType::Poker;
        sheet.case.hole_diameter = 3.0;
        sheet.case.remove_poker_slots = true;
        sheet.init_layers();
        draw_holes(&mut sheet);
        assert_eq!(sheet.layers[SWITCH_LAYER].cut_polys.len(), 4);
    }
}
