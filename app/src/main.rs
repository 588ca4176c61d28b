use physics::scenarios::{
    FreeFall, HingeLimit, ObliqueImpact, Pendulum, Scenario, Spring, StackedContact,
};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Runs a named scenario for a fixed wall-clock duration, logging every
/// entity's pose at each step. Rendering and input are out of scope here;
/// this is the scene driver the core's `get_all` is for.
fn run_scenario(name: &str, scenario: &dyn Scenario, duration_secs: f64, dt: f64) {
    let mut world = scenario.create();
    let steps = (duration_secs / dt).round() as usize;
    info!(scenario = name, steps, dt, "starting scenario");

    for step in 0..steps {
        world.step(dt);
        if step % 30 == 0 {
            for entity in world.get_all() {
                info!(
                    scenario = name,
                    step,
                    entity = entity.id.0,
                    x = entity.world_position.x,
                    y = entity.world_position.y,
                    z = entity.world_position.z,
                    "pose"
                );
            }
        }
    }
}

fn main() -> color_eyre::eyre::Result<()> {
    let fmt_layer = fmt::layer().pretty();
    let filter_layer = EnvFilter::from_default_env();
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();
    color_eyre::install()?;

    let dt = 1.0 / 60.0;
    run_scenario("free_fall", &FreeFall {}, 3.0, dt);
    run_scenario("pendulum", &Pendulum {}, 4.0, dt);
    run_scenario("hinge_limit", &HingeLimit {}, 4.0, dt);
    run_scenario("stacked_contact", &StackedContact {}, 2.0, dt);
    run_scenario("oblique_impact", &ObliqueImpact {}, 3.0, dt);
    run_scenario("spring", &Spring {}, 2.0, dt);

    Ok(())
}
