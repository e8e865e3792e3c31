//! Relationship anchor routing
//!
//! Each relationship end is attached to one side of its table. The side pair is
//! the one whose midpoints are closest; anchors sharing a side are spread
//! evenly along it, ordered by the position of the opposite table so lines do
//! not cross needlessly.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::canvas::Show;
use super::helper::Id;
use super::layout::{Coordinate, Point, coordinate};
use super::schema::{Direction, Relationship, RelationshipPoint, Table};

const DIRECTIONS: [Direction; 4] = [
    Direction::Top,
    Direction::Bottom,
    Direction::Left,
    Direction::Right,
];

/// Drawn position of one relationship end
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
}

impl Anchor {
    /// Copy the anchor into `point`, returning whether anything changed
    pub fn apply(&self, point: &mut RelationshipPoint) -> bool {
        let changed =
            point.x != self.x || point.y != self.y || point.direction != self.direction;
        point.x = self.x;
        point.y = self.y;
        point.direction = self.direction;
        changed
    }
}

/// Routed anchors of one relationship
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub id: Id,
    pub start: Anchor,
    pub end: Anchor,
}

fn side_midpoint(coordinate: &Coordinate, direction: Direction) -> Point {
    let center = coordinate.center();
    match direction {
        Direction::Top => Point::new(center.x, coordinate.lt.y),
        Direction::Bottom => Point::new(center.x, coordinate.lb.y),
        Direction::Left => Point::new(coordinate.lt.x, center.y),
        Direction::Right => Point::new(coordinate.rt.x, center.y),
    }
}

fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Side pair with the shortest midpoint distance
fn nearest_sides(start: &Coordinate, end: &Coordinate) -> (Direction, Direction) {
    let mut best = (Direction::Top, Direction::Top);
    let mut min = f64::INFINITY;
    for start_direction in DIRECTIONS {
        for end_direction in DIRECTIONS {
            let d = distance(
                side_midpoint(start, start_direction),
                side_midpoint(end, end_direction),
            );
            if d < min {
                min = d;
                best = (start_direction, end_direction);
            }
        }
    }
    best
}

/// Position of the `index`-th of `count` anchors on a side
fn spread(coordinate: &Coordinate, direction: Direction, index: usize, count: usize) -> Point {
    let ratio = (index + 1) as f64 / (count + 1) as f64;
    match direction {
        Direction::Top => Point::new(
            coordinate.lt.x + coordinate.width() * ratio,
            coordinate.lt.y,
        ),
        Direction::Bottom => Point::new(
            coordinate.lb.x + coordinate.width() * ratio,
            coordinate.lb.y,
        ),
        Direction::Left => Point::new(
            coordinate.lt.x,
            coordinate.lt.y + coordinate.height() * ratio,
        ),
        Direction::Right => Point::new(
            coordinate.rt.x,
            coordinate.rt.y + coordinate.height() * ratio,
        ),
    }
}

struct Endpoint {
    route: usize,
    is_start: bool,
    /// Sort key: center of the opposite table along the side's axis
    key: f64,
}

/// Compute anchors for every relationship whose tables both exist.
/// Dangling relationships are skipped and keep their stored points.
pub fn relationship_sort(
    tables: &IndexMap<Id, Table>,
    relationships: &IndexMap<Id, Relationship>,
    show: &Show,
) -> Vec<Route> {
    let mut coordinates: HashMap<&str, Coordinate> = HashMap::new();
    let mut routes = Vec::new();
    let mut sides: IndexMap<(&str, Direction), Vec<Endpoint>> = IndexMap::new();

    for relationship in relationships.values() {
        let start_id = relationship.start.table_id.as_str();
        let end_id = relationship.end.table_id.as_str();
        let (Some(start_table), Some(end_table)) = (tables.get(start_id), tables.get(end_id))
        else {
            continue;
        };
        let start = *coordinates
            .entry(start_id)
            .or_insert_with(|| coordinate(start_table, show));
        let end = *coordinates
            .entry(end_id)
            .or_insert_with(|| coordinate(end_table, show));

        let (start_direction, end_direction) = if start_id == end_id {
            (Direction::Right, Direction::Top)
        } else {
            nearest_sides(&start, &end)
        };

        let axis_key = |direction: Direction, other: &Coordinate| match direction {
            Direction::Top | Direction::Bottom => other.center().x,
            Direction::Left | Direction::Right => other.center().y,
        };

        let route = routes.len();
        sides
            .entry((start_id, start_direction))
            .or_default()
            .push(Endpoint {
                route,
                is_start: true,
                key: axis_key(start_direction, &end),
            });
        sides
            .entry((end_id, end_direction))
            .or_default()
            .push(Endpoint {
                route,
                is_start: false,
                key: axis_key(end_direction, &start),
            });

        let placeholder = Anchor {
            x: 0.0,
            y: 0.0,
            direction: start_direction,
        };
        routes.push(Route {
            id: relationship.id.clone(),
            start: placeholder,
            end: Anchor {
                direction: end_direction,
                ..placeholder
            },
        });
    }

    for ((table_id, direction), mut endpoints) in sides {
        let Some(table_coordinate) = coordinates.get(table_id) else {
            continue;
        };
        endpoints.sort_by(|a, b| a.key.total_cmp(&b.key));
        let count = endpoints.len();
        for (index, endpoint) in endpoints.iter().enumerate() {
            let point = spread(table_coordinate, direction, index, count);
            let anchor = Anchor {
                x: point.x,
                y: point.y,
                direction,
            };
            let route = &mut routes[endpoint.route];
            if endpoint.is_start {
                route.start = anchor;
            } else {
                route.end = anchor;
            }
        }
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, RelationshipType};

    fn table(id: &str, left: f64, top: f64) -> Table {
        Table::new(id)
            .with_id(id)
            .with_position(left, top)
            .add_column(Column::new("id", "int").with_id(format!("{id}.id")))
    }

    fn relationship(id: &str, start: &str, end: &str) -> Relationship {
        Relationship::new(
            RelationshipType::OneN,
            RelationshipPoint::new(start, vec![format!("{start}.id")]),
            RelationshipPoint::new(end, vec![format!("{end}.id")]),
        )
        .with_id(id)
    }

    fn maps(
        tables: Vec<Table>,
        relationships: Vec<Relationship>,
    ) -> (IndexMap<Id, Table>, IndexMap<Id, Relationship>) {
        (
            tables.into_iter().map(|t| (t.id.clone(), t)).collect(),
            relationships.into_iter().map(|r| (r.id.clone(), r)).collect(),
        )
    }

    #[test]
    fn test_side_by_side_tables_face_each_other() {
        let (tables, relationships) = maps(
            vec![table("a", 0.0, 0.0), table("b", 1000.0, 0.0)],
            vec![relationship("r", "a", "b")],
        );
        let routes = relationship_sort(&tables, &relationships, &Show::default());
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].start.direction, Direction::Right);
        assert_eq!(routes[0].end.direction, Direction::Left);
    }

    #[test]
    fn test_stacked_tables_use_bottom_and_top() {
        let (tables, relationships) = maps(
            vec![table("a", 0.0, 0.0), table("b", 0.0, 1000.0)],
            vec![relationship("r", "a", "b")],
        );
        let routes = relationship_sort(&tables, &relationships, &Show::default());
        assert_eq!(routes[0].start.direction, Direction::Bottom);
        assert_eq!(routes[0].end.direction, Direction::Top);
    }

    #[test]
    fn test_self_relationship_uses_right_and_top() {
        let (tables, relationships) =
            maps(vec![table("a", 0.0, 0.0)], vec![relationship("r", "a", "a")]);
        let routes = relationship_sort(&tables, &relationships, &Show::default());
        assert_eq!(routes[0].start.direction, Direction::Right);
        assert_eq!(routes[0].end.direction, Direction::Top);
    }

    #[test]
    fn test_shared_side_is_spread_in_order() {
        let (tables, relationships) = maps(
            vec![
                table("a", 500.0, 0.0),
                table("low", 500.0, 1000.0),
                table("lower", 520.0, 1400.0),
            ],
            vec![relationship("r2", "a", "lower"), relationship("r1", "a", "low")],
        );
        let routes = relationship_sort(&tables, &relationships, &Show::default());
        let r1 = routes.iter().find(|r| r.id == "r1").unwrap();
        let r2 = routes.iter().find(|r| r.id == "r2").unwrap();
        assert_eq!(r1.start.direction, Direction::Bottom);
        assert_eq!(r2.start.direction, Direction::Bottom);
        assert!(r1.start.x < r2.start.x);
        assert_eq!(r1.start.y, r2.start.y);
    }

    #[test]
    fn test_dangling_relationship_is_skipped() {
        let (tables, relationships) =
            maps(vec![table("a", 0.0, 0.0)], vec![relationship("r", "a", "gone")]);
        assert!(relationship_sort(&tables, &relationships, &Show::default()).is_empty());
    }

    #[test]
    fn test_anchor_apply_reports_change() {
        let anchor = Anchor {
            x: 1.0,
            y: 2.0,
            direction: Direction::Left,
        };
        let mut point = RelationshipPoint::new("a", vec![]);
        assert!(anchor.apply(&mut point));
        assert!(!anchor.apply(&mut point));
        assert_eq!(point.direction, Direction::Left);
    }
}
