//! A scene with a lower floor, a ramp and an upper floor. An agent chases a target that keeps
//! circling between both levels.

use bevy::{
    asset::RenderAssetUsages, color::palettes::tailwind, prelude::*,
    render::mesh::PrimitiveTopology,
};
use bevy_trinav::{prelude::*, trinav::TriMesh};

const COLUMNS: usize = 12;
const ROWS: usize = 6;
const AGENT_SPEED: f32 = 3.0;
/// Agents slow down to this fraction of their speed while climbing.
const CLIMBING_SPEED: f32 = 0.6;

fn main() -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((TrinavPlugin, NavDebugPlugin::<NavAgent>::default()))
        .add_systems(Startup, setup)
        .add_systems(Update, move_target)
        .add_systems(Update, move_agents.after(NavSystems::Steer))
        .run()
}

#[derive(Component)]
struct Target;

/// Ground height of the grid line at `x`: low floor, ramp, high floor.
fn ground_height(x: usize) -> f32 {
    match x {
        0..=4 => 0.0,
        5..=7 => (x - 4) as f32,
        _ => 3.0,
    }
}

fn ground_mesh() -> Mesh {
    let corner = |x: usize, z: usize| [x as f32, ground_height(x), z as f32];
    let mut positions = Vec::with_capacity(COLUMNS * ROWS * 6);
    for x in 0..COLUMNS {
        for z in 0..ROWS {
            positions.extend([
                corner(x, z),
                corner(x, z + 1),
                corner(x + 1, z),
                corner(x + 1, z),
                corner(x, z + 1),
                corner(x + 1, z + 1),
            ]);
        }
    }
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_computed_flat_normals()
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let ground = ground_mesh();
    let transform = Transform::from_xyz(-(COLUMNS as f32) / 2.0, 0.0, -(ROWS as f32) / 2.0);
    let trimesh = TriMesh::from_mesh_with_transform(&ground, &GlobalTransform::from(transform))?;
    commands.insert_resource(Navigation::build(&trimesh)?);
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(ground)),
        MeshMaterial3d(materials.add(Color::from(tailwind::GRAY_300))),
        transform,
    ));

    let target = commands
        .spawn((
            Name::new("Target"),
            Target,
            Mesh3d(meshes.add(Sphere::new(0.3))),
            MeshMaterial3d(materials.add(Color::from(tailwind::RED_500))),
            Transform::from_xyz(4.0, 3.3, 0.0),
        ))
        .id();
    // The agent's origin is at its feet
    commands.spawn((
        Name::new("Agent"),
        NavAgent::new(target),
        Transform::from_xyz(-4.0, 0.0, 1.0),
        Visibility::default(),
        children![(
            Mesh3d(meshes.add(Capsule3d::new(0.3, 0.6))),
            MeshMaterial3d(materials.add(Color::from(tailwind::BLUE_500))),
            Transform::from_xyz(0.0, 0.6, 0.0),
        )],
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.5, -1.0, 0.3), Vec3::Y),
    ));
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 12.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    Ok(())
}

/// Circles the target across both floors, always standing on the ground.
fn move_target(time: Res<Time>, mut target: Single<&mut Transform, With<Target>>) {
    let angle = time.elapsed_secs() * 0.3;
    let x = angle.cos() * 5.0;
    let z = angle.sin() * 2.0;
    let grid_x = x + COLUMNS as f32 / 2.0;
    let height = (grid_x - 4.0).clamp(0.0, 3.0);
    target.translation = Vec3::new(x, height + 0.3, z);
}

fn move_agents(time: Res<Time>, mut agents: Query<(&mut Transform, &NavSteering)>) {
    for (mut transform, steering) in &mut agents {
        let Some(way_point) = steering.way_point else {
            continue;
        };
        let speed = if steering.climbing {
            AGENT_SPEED * CLIMBING_SPEED
        } else {
            AGENT_SPEED
        };
        let remaining = way_point - transform.translation;
        transform.translation += remaining.clamp_length_max(speed * time.delta_secs());
    }
}
