//! Loads an OBJ model, draws one frame with the core crate, and writes
//! the result to a PNG. Not part of the library — a usage example for
//! the `Engine`/`Mesh`/`Shader` API, run as `main <model.obj> <out.png>`.

extern crate image;
extern crate softrender;
extern crate tobj;

use std::env;
use std::path::Path;

use softrender::math::{Vec2, Vec3};
use softrender::{Camera, Color8, Engine, FrameContext, InputState, Mesh, ModelInstance, Shader, Transform};

fn main() {
    let mut args = env::args().skip(1);
    let obj_path = args.next().expect("usage: main <model.obj> <out.png>");
    let out_path = args.next().expect("usage: main <model.obj> <out.png>");

    let mesh = load_mesh(&obj_path);

    let width = 800usize;
    let height = 600usize;

    let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0));
    let clear_color = Color8::new(0, 0, 0, 255);
    let mut engine = Engine::new(width, height, camera, clear_color).expect("engine dimensions must be non-zero");

    let model = ModelInstance {
        mesh,
        transform: Transform::default(),
        shader: Shader::Lit { light_dir: Vec3::new(-0.3, -0.5, 0.8) },
    };

    let mut color_buffer = vec![0u32; width * height];
    let ctx = FrameContext { delta_time: 0.0, input: InputState::default() };
    engine.render_frame(&[model], &mut color_buffer, ctx);

    write_png(&color_buffer, width, height, Path::new(&out_path));
}

fn load_mesh(path: &str) -> Mesh {
    let (models, _materials) = tobj::load_obj(Path::new(path)).expect("failed to load obj");
    let obj_mesh = &models.first().expect("obj file contains no models").mesh;

    let vertex_count = obj_mesh.positions.len() / 3;

    let positions = (0..vertex_count)
        .map(|i| Vec3::new(obj_mesh.positions[i * 3], obj_mesh.positions[i * 3 + 1], obj_mesh.positions[i * 3 + 2]))
        .collect();

    let normals = if obj_mesh.normals.is_empty() {
        vec![Vec3::new(0.0, 0.0, 1.0); vertex_count]
    } else {
        (0..vertex_count)
            .map(|i| Vec3::new(obj_mesh.normals[i * 3], obj_mesh.normals[i * 3 + 1], obj_mesh.normals[i * 3 + 2]))
            .collect()
    };

    let uvs = if obj_mesh.texcoords.is_empty() {
        vec![Vec2::ZERO; vertex_count]
    } else {
        (0..vertex_count)
            .map(|i| Vec2::new(obj_mesh.texcoords[i * 2], obj_mesh.texcoords[i * 2 + 1]))
            .collect()
    };

    let indices = obj_mesh.indices.clone();

    Mesh::new(positions, uvs, normals, indices).expect("obj produced an invalid mesh")
}

fn write_png(color_buffer: &[u32], width: usize, height: usize, out_path: &Path) {
    let mut img = image::ImageBuffer::new(width as u32, height as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let packed = color_buffer[y as usize * width + x as usize];
        *pixel = image::Rgba([
            (packed & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 24) & 0xff) as u8,
        ]);
    }
    image::ImageRgba8(img).save(out_path).expect("failed to write png");
}
