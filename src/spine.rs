/*
 * Spine Solver Module
 *
 * Constrained inverse kinematics for the fish backbone. The head node snaps
 * to the agent position each tick; every following node is re-placed at a
 * fixed segment length from its predecessor, with the bend between
 * consecutive segments clamped so the body stays eel-stiff instead of
 * folding on itself.
 */

use nannou::prelude::*;

use crate::vecmath;

// Maximum bend per joint in radians (about 10.3 degrees)
pub const MAX_BEND: f32 = 0.18;

// Solve the chain in place toward `head`. The first joint has no previous
// segment to compare against, so the bend clamp starts at node 2.
pub fn solve(spine: &mut [Vec2], head: Vec2, segment_len: f32) {
    if spine.is_empty() {
        return;
    }
    spine[0] = head;

    for k in 1..spine.len() {
        let prev = spine[k - 1];
        let curr = spine[k];
        let mut angle = (curr.y - prev.y).atan2(curr.x - prev.x);

        if k > 1 {
            let prev2 = spine[k - 2];
            let prev_angle = (prev.y - prev2.y).atan2(prev.x - prev2.x);
            let diff = vecmath::wrap_angle(angle - prev_angle);
            if diff.abs() > MAX_BEND {
                angle = prev_angle + if diff > 0.0 { MAX_BEND } else { -MAX_BEND };
            }
        }

        spine[k] = vec2(
            prev.x + angle.cos() * segment_len,
            prev.y + angle.sin() * segment_len,
        );
    }
}

// Segment length for a fish of the given size under the body length setting
pub fn segment_len(size: f32, body_length: f32) -> f32 {
    size * 6.5 * body_length / (crate::SPINE_SEGMENTS - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SPINE_SEGMENTS;

    fn straight_spine(head: Vec2, step: f32) -> Vec<Vec2> {
        (0..SPINE_SEGMENTS)
            .map(|j| vec2(head.x - j as f32 * step, head.y))
            .collect()
    }

    fn joint_angles(spine: &[Vec2]) -> Vec<f32> {
        spine
            .windows(2)
            .map(|w| (w[1].y - w[0].y).atan2(w[1].x - w[0].x))
            .collect()
    }

    #[test]
    fn segments_keep_fixed_length() {
        let mut spine = straight_spine(vec2(100.0, 100.0), 5.0);
        let seg = segment_len(55.0, 1.0);
        solve(&mut spine, vec2(103.0, 104.0), seg);

        assert_eq!(spine[0], vec2(103.0, 104.0));
        for w in spine.windows(2) {
            let d = vecmath::mag(w[1] - w[0]);
            assert!((d - seg).abs() < 1e-3, "segment length drifted: {}", d);
        }
    }

    #[test]
    fn bend_never_exceeds_clamp() {
        let mut spine = straight_spine(vec2(0.0, 0.0), 5.0);
        let seg = segment_len(50.0, 1.0);

        // Drag the head through a hard turn over several ticks
        let mut head = vec2(0.0, 0.0);
        for i in 0..120 {
            let a = i as f32 * 0.12;
            head += vec2(a.cos(), a.sin()) * 3.0;
            solve(&mut spine, head, seg);

            let angles = joint_angles(&spine);
            for pair in angles.windows(2) {
                let bend = vecmath::wrap_angle(pair[1] - pair[0]).abs();
                assert!(bend <= MAX_BEND + 1e-4, "joint bent {} rad", bend);
            }
        }
    }

    #[test]
    fn first_joint_is_unclamped() {
        // Node 1 may swing freely: place the old node 1 behind the head and
        // move the head sideways, the first segment follows without limit.
        let mut spine = straight_spine(vec2(0.0, 0.0), 5.0);
        let seg = segment_len(50.0, 1.0);
        solve(&mut spine, vec2(0.0, 40.0), seg);

        let first = (spine[1].y - spine[0].y).atan2(spine[1].x - spine[0].x);
        // The old node 1 sat at (-5, 0); relative to the new head the segment
        // points steeply downward, far beyond MAX_BEND from the old heading.
        assert!(first.abs() > MAX_BEND);
    }

    #[test]
    fn solver_is_nan_free_for_degenerate_chains() {
        // All nodes coincident: atan2(0, 0) is defined (0.0), so the chain
        // must re-extend along +x without producing NaN.
        let mut spine = vec![vec2(10.0, 10.0); SPINE_SEGMENTS];
        solve(&mut spine, vec2(10.0, 10.0), 4.0);
        for p in &spine {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        assert!((vecmath::mag(spine[1] - spine[0]) - 4.0).abs() < 1e-4);
    }
}
