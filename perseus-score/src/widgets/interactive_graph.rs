//! Interactive-graph widget: points, lines and shapes drawn on a grid.
//!
//! Guesses and rubrics share one [`GraphState`] shape tagged by graph type.
//! Every comparison is tolerant ([`DEFAULT_TOLERANCE`]) and works on copies,
//! so neither the guess nor the rubric is modified.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::math::{
    angle_measure, approx_eq, canonical_sine_coefficients, codirectional, collinear,
    coord_sets_equal, is_clockwise, points_equal, polygons_similar, quadratic_coefficients,
    sinusoid_coefficients, unordered_match, DEFAULT_TOLERANCE,
};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{Coord, Score, UserInput, WidgetOptions};

/// A pair of points defining a segment, line or ray.
pub type CoordPair = [Coord; 2];

/// How an angle guess is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMatch {
    /// Same vertex, arms along the same lines
    #[default]
    Exact,
    /// Same measure anywhere on the grid
    Congruent,
}

/// How a polygon guess is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonMatch {
    /// Same vertices, in any order
    #[default]
    Exact,
    /// Same shape and size
    Congruent,
    /// Same shape, any size
    Similar,
    /// Same shape, sides within 0.1
    Approx,
}

/// Graph contents, as drawn by the learner or stored as the correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GraphState {
    /// Not graded
    None,
    Point {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<Vec<Coord>>,
    },
    Segment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<Vec<CoordPair>>,
    },
    Linear {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<CoordPair>,
    },
    LinearSystem {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<Vec<CoordPair>>,
    },
    Ray {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<CoordPair>,
    },
    Circle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        center: Option<Coord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
    },
    Angle {
        /// `[arm point, vertex, arm point]`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<[Coord; 3]>,
        #[serde(
            rename = "allowReflexAngles",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        allow_reflex_angles: Option<bool>,
        #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
        match_type: Option<AngleMatch>,
    },
    Polygon {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<Vec<Coord>>,
        #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
        match_type: Option<PolygonMatch>,
    },
    Quadratic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<[Coord; 3]>,
    },
    Sinusoid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coords: Option<CoordPair>,
    },
    /// Graph types this crate cannot grade
    #[serde(other)]
    Unsupported,
}

impl Default for GraphState {
    fn default() -> Self {
        Self::Linear { coords: None }
    }
}

impl GraphState {
    pub fn graph_type(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Point { .. } => "point",
            Self::Segment { .. } => "segment",
            Self::Linear { .. } => "linear",
            Self::LinearSystem { .. } => "linear-system",
            Self::Ray { .. } => "ray",
            Self::Circle { .. } => "circle",
            Self::Angle { .. } => "angle",
            Self::Polygon { .. } => "polygon",
            Self::Quadratic { .. } => "quadratic",
            Self::Sinusoid { .. } => "sinusoid",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether the graph holds anything to grade.
    pub fn has_value(&self) -> bool {
        match self {
            Self::Point { coords } | Self::Polygon { coords, .. } => coords.is_some(),
            Self::Segment { coords } | Self::LinearSystem { coords } => coords.is_some(),
            Self::Linear { coords } | Self::Ray { coords } | Self::Sinusoid { coords } => {
                coords.is_some()
            }
            Self::Angle { coords, .. } | Self::Quadratic { coords } => coords.is_some(),
            Self::Circle { center, radius } => center.is_some() && radius.is_some(),
            Self::None | Self::Unsupported => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveGraphWidgetOptions {
    /// The graph the learner starts from; its type decides what is drawn
    #[serde(default)]
    pub graph: GraphState,
    /// The correct answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<GraphState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[[f64; 2]; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markings: Option<String>,
    #[serde(default)]
    pub show_protractor: bool,
}

fn missing_coords(graph: &GraphState) -> ScoreError {
    ScoreError::missing_correct(format!("{} graph", graph.graph_type()), "coords")
}

/// Same endpoints, in either order.
fn same_segment(a: &CoordPair, b: &CoordPair) -> bool {
    (points_equal(&a[0], &b[0]) && points_equal(&a[1], &b[1]))
        || (points_equal(&a[0], &b[1]) && points_equal(&a[1], &b[0]))
}

fn segments_equal(guess: &[CoordPair], correct: &[CoordPair]) -> bool {
    unordered_match(guess, correct, same_segment)
}

/// Both points of `guess` lie on the line through `correct`.
fn same_line(guess: &CoordPair, correct: &CoordPair) -> bool {
    collinear(&correct[0], &correct[1], &guess[0]) && collinear(&correct[0], &correct[1], &guess[1])
}

fn same_ray(guess: &CoordPair, correct: &CoordPair) -> bool {
    let guess_direction = [guess[1][0] - guess[0][0], guess[1][1] - guess[0][1]];
    let correct_direction = [correct[1][0] - correct[0][0], correct[1][1] - correct[0][1]];
    points_equal(&guess[0], &correct[0]) && codirectional(&guess_direction, &correct_direction)
}

fn angles_match(guess: &[Coord; 3], correct: &[Coord; 3], allow_reflex: bool, match_type: AngleMatch) -> bool {
    if match_type == AngleMatch::Congruent {
        return approx_eq(
            angle_measure(guess, allow_reflex),
            angle_measure(correct, allow_reflex),
        );
    }

    // Without reflex angles, a guess drawn clockwise is read with its arms swapped.
    let mut guess = *guess;
    if !allow_reflex && is_clockwise(&[guess[0], guess[2], guess[1]]) {
        guess.reverse();
    }

    points_equal(&correct[1], &guess[1])
        && collinear(&correct[1], &correct[0], &guess[0])
        && collinear(&correct[1], &correct[2], &guess[2])
}

fn polygons_match(guess: &[Coord], correct: &[Coord], match_type: PolygonMatch) -> bool {
    match match_type {
        PolygonMatch::Exact => coord_sets_equal(guess, correct),
        PolygonMatch::Congruent => polygons_similar(guess, correct, DEFAULT_TOLERANCE),
        PolygonMatch::Similar => polygons_similar(guess, correct, f64::INFINITY),
        PolygonMatch::Approx => polygons_similar(guess, correct, 0.1),
    }
}

fn all_approx_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y))
}

/// Compare a guess and a correct graph of the same type.
fn graphs_match(guess: &GraphState, correct: &GraphState) -> Result<bool> {
    use GraphState::{
        Angle, Circle, Linear, LinearSystem, Point, Polygon, Quadratic, Ray, Segment, Sinusoid,
    };

    let matched = match (guess, correct) {
        (Point { coords: Some(g) }, Point { coords }) => {
            coord_sets_equal(g, coords.as_ref().ok_or_else(|| missing_coords(correct))?)
        }
        (Segment { coords: Some(g) }, Segment { coords }) => {
            segments_equal(g, coords.as_ref().ok_or_else(|| missing_coords(correct))?)
        }
        (Linear { coords: Some(g) }, Linear { coords }) => {
            same_line(g, coords.as_ref().ok_or_else(|| missing_coords(correct))?)
        }
        (LinearSystem { coords: Some(g) }, LinearSystem { coords }) => {
            let c = coords.as_ref().ok_or_else(|| missing_coords(correct))?;
            match (g.as_slice(), c.as_slice()) {
                ([g1, g2], [c1, c2]) => {
                    (same_line(g1, c1) && same_line(g2, c2))
                        || (same_line(g1, c2) && same_line(g2, c1))
                }
                _ => false,
            }
        }
        (Ray { coords: Some(g) }, Ray { coords }) => {
            same_ray(g, coords.as_ref().ok_or_else(|| missing_coords(correct))?)
        }
        (
            Circle {
                center: Some(g_center),
                radius: Some(g_radius),
            },
            Circle { center, radius },
        ) => {
            let (Some(c_center), Some(c_radius)) = (center, radius) else {
                return Err(ScoreError::missing_correct("circle graph", "center and radius"));
            };
            points_equal(g_center, c_center) && approx_eq(*g_radius, *c_radius)
        }
        (
            Angle {
                coords: Some(g), ..
            },
            Angle {
                coords,
                allow_reflex_angles,
                match_type,
            },
        ) => angles_match(
            g,
            coords.as_ref().ok_or_else(|| missing_coords(correct))?,
            allow_reflex_angles.unwrap_or(false),
            match_type.unwrap_or_default(),
        ),
        (
            Polygon {
                coords: Some(g), ..
            },
            Polygon { coords, match_type },
        ) => polygons_match(
            g,
            coords.as_ref().ok_or_else(|| missing_coords(correct))?,
            match_type.unwrap_or_default(),
        ),
        (Quadratic { coords: Some(g) }, Quadratic { coords }) => {
            let c = coords.as_ref().ok_or_else(|| missing_coords(correct))?;
            match (quadratic_coefficients(g), quadratic_coefficients(c)) {
                (Some(g), Some(c)) => all_approx_eq(&g, &c),
                _ => false,
            }
        }
        (Sinusoid { coords: Some(g) }, Sinusoid { coords }) => {
            let c = coords.as_ref().ok_or_else(|| missing_coords(correct))?;
            match (sinusoid_coefficients(g), sinusoid_coefficients(c)) {
                (Some(g), Some(c)) => all_approx_eq(
                    &canonical_sine_coefficients(g),
                    &canonical_sine_coefficients(c),
                ),
                _ => false,
            }
        }
        _ => false,
    };
    Ok(matched)
}

/// Score a graph guess.
///
/// A rubric graph of type `none` is worth nothing (0 of 0). A guess of the
/// rubric's type with a value is compared; a guess without a value is
/// invalid; a guess of another type is wrong. A rubric missing its correct
/// coordinates is an error once there is a guess to compare.
pub fn score_interactive_graph(
    guess: Option<&GraphState>,
    options: &InteractiveGraphWidgetOptions,
) -> Result<Score> {
    let Some(guess) = guess else {
        return Ok(Score::invalid());
    };

    if options.graph == GraphState::None {
        return Ok(Score::Points {
            earned: 0.0,
            total: 0.0,
            message: None,
        });
    }

    let has_value = guess.has_value();
    let Some(correct) = &options.correct else {
        if has_value {
            return Err(ScoreError::missing_correct("interactive-graph", "correct"));
        }
        return Ok(Score::invalid());
    };

    if has_value && guess.graph_type() == correct.graph_type() {
        if graphs_match(guess, correct)? {
            return Ok(Score::correct());
        }
    } else if !has_value {
        return Ok(Score::invalid());
    }

    Ok(Score::incorrect())
}

pub fn validate_interactive_graph(
    guess: Option<&GraphState>,
    options: &InteractiveGraphWidgetOptions,
) -> Option<Score> {
    if options.graph == GraphState::None {
        return None;
    }
    match guess {
        Some(guess) if guess.has_value() => None,
        _ => Some(Score::invalid()),
    }
}

fn graph_input(input: Option<&UserInput>) -> Option<&GraphState> {
    match input {
        Some(UserInput::InteractiveGraph(graph)) => Some(graph),
        _ => None,
    }
}

/// Widget logic for `interactive-graph`.
pub struct InteractiveGraphWidget;

impl InteractiveGraphWidget {
    fn options<'a>(&self, options: &'a WidgetOptions) -> Result<&'a InteractiveGraphWidgetOptions> {
        match options {
            WidgetOptions::InteractiveGraph(graph) => Ok(graph),
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl Scorer for InteractiveGraphWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        score_interactive_graph(graph_input(input), self.options(options)?)
    }
}

impl InputValidator for InteractiveGraphWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        match options {
            WidgetOptions::InteractiveGraph(graph) => {
                validate_interactive_graph(graph_input(input), graph)
            }
            _ => Some(Score::invalid()),
        }
    }
}

impl WidgetLogic for InteractiveGraphWidget {
    fn name(&self) -> &str {
        "interactive-graph"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    /// Everything except the correct graph.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let graph = self.options(options)?;
        let mut public = serde_json::to_value(graph)?;
        if let Some(fields) = public.as_object_mut() {
            fields.remove("correct");
        }
        Ok(public)
    }

    fn default_options(&self) -> Value {
        json!({
            "labels": ["$x$", "$y$"],
            "range": [[-10, 10], [-10, 10]],
            "step": [1, 1],
            "markings": "graph",
            "showProtractor": false,
            "graph": {"type": "linear"},
            "correct": {"type": "linear"},
        })
    }
}
