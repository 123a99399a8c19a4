use crate::geometry::Point;

/// Groups polygon rings into polygons, each an outer ring followed by its holes.
///
/// The first ring with a non-zero area fixes the outer winding. Every later
/// ring with the same winding opens a new polygon; a ring with the opposite
/// winding is a hole of the current one. Zero-area rings are dropped. With
/// zero or one ring the input is returned as a single polygon untouched.
pub fn classify_rings(rings: Vec<Vec<Point>>) -> Vec<Vec<Vec<Point>>> {
    if rings.len() <= 1 {
        return vec![rings];
    }

    let mut polygons = Vec::new();
    let mut polygon: Option<Vec<Vec<Point>>> = None;
    let mut outer_ccw: Option<bool> = None;

    for ring in rings {
        let area = signed_area(&ring);
        if area == 0 {
            continue;
        }

        let ccw = area < 0;
        let outer = *outer_ccw.get_or_insert(ccw);

        match polygon.as_mut() {
            Some(current) if ccw != outer => current.push(ring),
            _ => {
                if let Some(done) = polygon.replace(vec![ring]) {
                    polygons.push(done);
                }
            }
        }
    }

    if let Some(done) = polygon {
        polygons.push(done);
    }
    polygons
}

/// Twice the signed area of a ring (shoelace), wrapping from the last point
/// back to the first. Positive for clockwise rings in Y-down tile space.
pub fn signed_area(ring: &[Point]) -> i64 {
    let Some(&last) = ring.last() else {
        return 0;
    };
    let mut sum = 0i64;
    let mut to = last;
    for &from in ring {
        sum += (i64::from(to.x) - i64::from(from.x)) * (i64::from(from.y) + i64::from(to.y));
        to = from;
    }
    sum
}
