//! Built-in sample data: a few routes with per-sample speed, and a graticule.

use geoline_engine::coords::LatLng;

#[derive(Debug, Copy, Clone)]
pub struct Sample {
    pub at: LatLng,
    /// km/h
    pub speed: f32,
    /// Lost GPS fix; drawn as a gap.
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub name: &'static str,
    pub samples: Vec<Sample>,
}

impl Route {
    /// Appends a sample continuing the last heading.
    pub fn extend(&mut self) {
        let n = self.samples.len();
        if n < 2 {
            return;
        }
        let (a, b) = (self.samples[n - 2], self.samples[n - 1]);
        self.samples.push(Sample {
            at: LatLng::new(
                2.0 * b.at.lat - a.at.lat,
                2.0 * b.at.lng - a.at.lng,
            ),
            speed: b.speed,
            hidden: false,
        });
    }
}

fn sample(origin: LatLng, dlat: f64, dlng: f64, speed: f32) -> Sample {
    Sample {
        at: LatLng::new(origin.lat + dlat, origin.lng + dlng),
        speed,
        hidden: false,
    }
}

pub fn routes(origin: LatLng) -> Vec<Route> {
    let coast = (0..40)
        .map(|i| {
            let t = i as f64;
            sample(
                origin,
                0.012 * (t * 0.4).sin(),
                -0.04 + t * 0.002,
                30.0 + 20.0 * (t as f32 * 0.2).sin(),
            )
        })
        .collect();

    // Hairpins: the second and fourth turns are near-reversals.
    let switchback = [
        (-0.02, -0.03),
        (-0.02, 0.01),
        (-0.018, -0.02),
        (-0.016, 0.012),
        (-0.0155, -0.025),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (dlat, dlng))| sample(origin, dlat, dlng, 15.0 + 5.0 * i as f32))
    .collect();

    let zigzag = (0..12)
        .map(|i| {
            let dlng = if i % 2 == 0 { 0.0 } else { 0.004 };
            sample(origin, 0.015 + i as f64 * 0.002, 0.02 + dlng, 60.0)
        })
        .collect();

    let mut tunnel: Vec<Sample> = (0..24)
        .map(|i| sample(origin, 0.025 - i as f64 * 0.0015, -0.03 + i as f64 * 0.001, 45.0))
        .collect();
    for s in &mut tunnel[9..14] {
        s.hidden = true;
    }

    vec![
        Route { name: "coast", samples: coast },
        Route { name: "switchback", samples: switchback },
        Route { name: "zigzag", samples: zigzag },
        Route { name: "tunnel", samples: tunnel },
    ]
}

/// Meridians and parallels every `step` degrees within `half_span` of `origin`.
pub fn graticule(origin: LatLng, half_span: f64, step: f64) -> Vec<Vec<LatLng>> {
    let n = (2.0 * half_span / step).round() as usize;
    let (lat0, lng0) = (origin.lat - half_span, origin.lng - half_span);
    let (lat1, lng1) = (origin.lat + half_span, origin.lng + half_span);

    let mut lines = Vec::with_capacity(2 * (n + 1));
    for k in 0..=n {
        let lng = lng0 + k as f64 * step;
        lines.push(vec![LatLng::new(lat0, lng), LatLng::new(lat1, lng)]);
        let lat = lat0 + k as f64 * step;
        lines.push(vec![LatLng::new(lat, lng0), LatLng::new(lat, lng1)]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_drawable() {
        let routes = routes(LatLng::new(0.0, 0.0));
        assert!(routes.iter().all(|r| r.samples.len() >= 2));
        assert!(routes.iter().any(|r| r.samples.iter().any(|s| s.hidden)));
    }

    #[test]
    fn extend_continues_heading() {
        let mut r = Route {
            name: "t",
            samples: vec![
                sample(LatLng::default(), 0.0, 0.0, 1.0),
                sample(LatLng::default(), 0.0, 1.0, 1.0),
            ],
        };
        r.extend();
        assert_eq!(r.samples[2].at, LatLng::new(0.0, 2.0));
    }

    #[test]
    fn graticule_line_count() {
        let g = graticule(LatLng::default(), 0.05, 0.01);
        assert_eq!(g.len(), 22);
        assert!(g.iter().all(|l| l.len() == 2));
    }
}
