use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon};

use crate::classify::classify_rings;
use crate::error::Result;
use crate::feature::{Feature, GeomType};
use crate::geojson::TileProjection;
use crate::geometry::Point;

impl Feature<'_> {
    /// Projected `geo_types` geometry for tile `x`/`y` at zoom `z`, with
    /// x = longitude and y = latitude. `None` for features of unknown type.
    pub fn to_geo(&self, x: u32, y: u32, z: u32) -> Result<Option<Geometry<f64>>> {
        let projection = TileProjection::new(self.extent(), x, y, z);
        let lines = self.load_geometry()?;

        let line_string = |line: &[Point]| -> LineString<f64> {
            line.iter()
                .map(|&p| {
                    let [lng, lat] = projection.project(p);
                    Coord { x: lng, y: lat }
                })
                .collect()
        };

        let geometry = match self.geom_type() {
            GeomType::Unknown => return Ok(None),
            GeomType::Point => {
                let mut points: Vec<geo_types::Point<f64>> = lines
                    .iter()
                    .filter_map(|line| line.first())
                    .map(|&p| {
                        let [lng, lat] = projection.project(p);
                        geo_types::Point::new(lng, lat)
                    })
                    .collect();
                if points.len() == 1 {
                    Geometry::Point(points.remove(0))
                } else {
                    Geometry::MultiPoint(MultiPoint::new(points))
                }
            }
            GeomType::LineString => {
                let mut strings: Vec<LineString<f64>> =
                    lines.iter().map(|line| line_string(line)).collect();
                if strings.len() == 1 {
                    Geometry::LineString(strings.remove(0))
                } else {
                    Geometry::MultiLineString(MultiLineString::new(strings))
                }
            }
            GeomType::Polygon => {
                let mut polygons: Vec<Polygon<f64>> = classify_rings(lines)
                    .iter()
                    .map(|rings| {
                        let mut rings = rings.iter().map(|ring| line_string(ring));
                        let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
                        Polygon::new(exterior, rings.collect())
                    })
                    .collect();
                if polygons.len() == 1 {
                    Geometry::Polygon(polygons.remove(0))
                } else {
                    Geometry::MultiPolygon(MultiPolygon::new(polygons))
                }
            }
        };

        Ok(Some(geometry))
    }
}
