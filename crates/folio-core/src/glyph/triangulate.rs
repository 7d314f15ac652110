//! Polygon-with-holes triangulation by ear clipping.
//!
//! Holes are first joined to the outer ring with a zero-width bridge (the
//! classic rightmost-vertex ray cast), turning the shape into one simple
//! polygon that ordinary ear clipping can consume. Output indices refer to
//! `outer` followed by each hole in order, like earcut's flat layout.

use glam::Vec2;

const EPS: f32 = 1e-9;

/// Twice the signed area; positive for counter-clockwise (y up).
pub fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

#[inline]
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) >= -EPS && cross(b, c, p) >= -EPS && cross(c, a, p) >= -EPS
}

pub fn point_in_polygon(p: Vec2, ring: &[Vec2]) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Triangulate `outer` with `holes`. Winding of the inputs does not matter.
/// Returns the flat vertex list and CCW triangles indexing into it.
pub fn triangulate(outer: &[Vec2], holes: &[Vec<Vec2>]) -> (Vec<Vec2>, Vec<[u32; 3]>) {
    let mut verts: Vec<Vec2> = Vec::with_capacity(outer.len() + holes.iter().map(Vec::len).sum::<usize>());
    verts.extend_from_slice(outer);
    if signed_area(outer) < 0.0 {
        verts.reverse();
    }
    let mut ring: Vec<usize> = (0..verts.len()).collect();

    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        let start = verts.len();
        verts.extend_from_slice(hole);
        if signed_area(hole) > 0.0 {
            verts[start..].reverse();
        }
        hole_rings.push((start..verts.len()).collect());
    }
    // Bridge rightmost holes first so later bridges cannot cross earlier ones.
    hole_rings.sort_by(|a, b| {
        let ax = a.iter().map(|&i| verts[i].x).fold(f32::MIN, f32::max);
        let bx = b.iter().map(|&i| verts[i].x).fold(f32::MIN, f32::max);
        bx.total_cmp(&ax)
    });
    for hole in &hole_rings {
        ring = bridge_hole(&verts, ring, hole);
    }

    let tris = ear_clip(&verts, ring);
    (verts, tris)
}

fn bridge_hole(verts: &[Vec2], ring: Vec<usize>, hole: &[usize]) -> Vec<usize> {
    let Some(m_pos) = (0..hole.len()).max_by(|&a, &b| verts[hole[a]].x.total_cmp(&verts[hole[b]].x)) else {
        return ring;
    };
    let m = verts[hole[m_pos]];

    // Nearest outer edge hit by a ray from m toward +x.
    let n = ring.len();
    let mut best: Option<(f32, usize)> = None;
    for k in 0..n {
        let (a, b) = (verts[ring[k]], verts[ring[(k + 1) % n]]);
        if (a.y > m.y) == (b.y > m.y) || (b.y - a.y).abs() < EPS {
            continue;
        }
        let x = a.x + (m.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x >= m.x && best.map_or(true, |(bx, _)| x < bx) {
            let cand = if a.x > b.x { k } else { (k + 1) % n };
            best = Some((x, cand));
        }
    }

    let bridge = match best {
        Some((hit_x, cand)) => {
            let hit = Vec2::new(hit_x, m.y);
            let p = verts[ring[cand]];
            // A vertex inside (m, hit, p) would block the bridge; take the one
            // closest in angle to the ray instead.
            let (t0, t1, t2) = if cross(m, hit, p) >= 0.0 { (m, hit, p) } else { (m, p, hit) };
            let mut chosen = cand;
            let mut best_key = (f32::MAX, f32::MAX);
            for (j, &vi) in ring.iter().enumerate() {
                let v = verts[vi];
                if j == cand || v.x < m.x || v == p || !in_triangle(v, t0, t1, t2) {
                    continue;
                }
                let d = v - m;
                let key = (d.y.atan2(d.x).abs(), d.length_squared());
                if key < best_key {
                    best_key = key;
                    chosen = j;
                }
            }
            chosen
        }
        None => (0..n)
            .min_by(|&a, &b| {
                verts[ring[a]]
                    .distance_squared(m)
                    .total_cmp(&verts[ring[b]].distance_squared(m))
            })
            .unwrap_or(0),
    };

    let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=bridge]);
    for s in 0..=hole.len() {
        merged.push(hole[(m_pos + s) % hole.len()]);
    }
    merged.extend_from_slice(&ring[bridge..]);
    merged
}

fn ear_clip(verts: &[Vec2], mut poly: Vec<usize>) -> Vec<[u32; 3]> {
    let mut tris = Vec::with_capacity(poly.len().saturating_sub(2));
    while poly.len() > 3 {
        let n = poly.len();
        let ear = (0..n).find(|&i| is_ear(verts, &poly, i));
        let i = match ear {
            Some(i) => i,
            None => {
                // Numerically stuck: drop the flattest corner.
                (0..n)
                    .min_by(|&a, &b| corner_area(verts, &poly, a).total_cmp(&corner_area(verts, &poly, b)))
                    .unwrap_or(0)
            }
        };
        let (a, b, c) = (poly[(i + n - 1) % n], poly[i], poly[(i + 1) % n]);
        if cross(verts[a], verts[b], verts[c]).abs() > EPS {
            tris.push([a as u32, b as u32, c as u32]);
        }
        poly.remove(i);
    }
    if poly.len() == 3 && cross(verts[poly[0]], verts[poly[1]], verts[poly[2]]).abs() > EPS {
        tris.push([poly[0] as u32, poly[1] as u32, poly[2] as u32]);
    }
    tris
}

fn corner_area(verts: &[Vec2], poly: &[usize], i: usize) -> f32 {
    let n = poly.len();
    cross(verts[poly[(i + n - 1) % n]], verts[poly[i]], verts[poly[(i + 1) % n]]).abs()
}

fn is_ear(verts: &[Vec2], poly: &[usize], i: usize) -> bool {
    let n = poly.len();
    let (a, b, c) = (
        verts[poly[(i + n - 1) % n]],
        verts[poly[i]],
        verts[poly[(i + 1) % n]],
    );
    if cross(a, b, c) <= EPS {
        return false;
    }
    for j in 0..n {
        let p = verts[poly[j]];
        if p == a || p == b || p == c {
            continue;
        }
        let prev = verts[poly[(j + n - 1) % n]];
        let next = verts[poly[(j + 1) % n]];
        // only reflex vertices can sit inside a convex corner
        if cross(prev, p, next) > EPS {
            continue;
        }
        if in_triangle(p, a, b, c) {
            return false;
        }
    }
    true
}
