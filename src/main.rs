/*
 * Koi Pond Simulation
 *
 * An interactive pond: steering-driven koi with IK spines wander the water,
 * seek food dropped by mouse click, and are rendered as layered gradient
 * shapes with fins, shadows and ripples. Parameters are adjustable live
 * through an egui panel.
 */

use koi_pond::app;

fn main() {
    nannou::app(app::model).update(app::update).run();
}
