//! Finalized-scene exports for the rendering and persistence collaborators.
//!
//! A [`SceneExport`] is the full produced interface of one generated
//! scene: per-object transforms and bounding boxes plus the relation
//! annotations. It is written as pretty JSON per scene, and the
//! [`GroundTruthWriter`] appends the tabular ground truth rows for a
//! whole batch to a single CSV file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data_structures::registry::Registry;
use crate::placement::Annotations;
use crate::resources::{Pose, Shape};

/// One object of a finalized scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: u32,
    pub name: String,
    pub shape: Shape,
    pub color: String,
    pub pose: Pose,
    pub position: [f32; 3],
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
}

/// Snapshot of a finalized scene, sufficient for a downstream renderer
/// and the ground-truth writer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneExport {
    pub scene_name: String,
    pub rule: String,
    pub query: String,
    pub objects: Vec<ObjectRecord>,
    pub annotations: Annotations,
}

impl SceneExport {
    pub fn from_scene(
        scene_name: String,
        rule: String,
        query: String,
        registry: &Registry,
        annotations: &Annotations,
    ) -> Self {
        let objects = registry
            .all()
            .iter()
            .map(|object| {
                let bbox = object.world_bbox();
                ObjectRecord {
                    id: object.id(),
                    name: object.name(),
                    shape: object.shape,
                    color: object.color.clone(),
                    pose: object.pose,
                    position: object.position().into(),
                    bbox_min: bbox.min.into(),
                    bbox_max: bbox.max.into(),
                }
            })
            .collect();
        Self {
            scene_name,
            rule,
            query,
            objects,
            annotations: annotations.clone(),
        }
    }

    /// Write `<dir>/<scene_name>.json`, returning the path.
    pub fn write_json(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.scene_name));
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(std::io::Error::from)?;
        // Surface a failed final flush instead of letting drop swallow it.
        writer.flush()?;
        Ok(path)
    }
}

/// Append-only CSV sink for a batch's ground truth.
///
/// One writer owns the file for the whole run; each scene's rows are
/// appended as one contiguous block so concurrent workers can never
/// interleave partial rows.
pub struct GroundTruthWriter {
    writer: BufWriter<File>,
}

const CSV_HEADER: &str = "scene_name,img_path,rule,query,object_name,\
bounding_box_min_x,bounding_box_min_y,bounding_box_min_z,\
bounding_box_max_x,bounding_box_max_y,bounding_box_max_z,\
world_pos_x,world_pos_y,world_pos_z";

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl GroundTruthWriter {
    /// Create (truncate) the CSV file and write the header row.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", CSV_HEADER)?;
        Ok(Self { writer })
    }

    /// Append every object row of one scene as a contiguous block.
    pub fn append_scene(&mut self, export: &SceneExport, img_path: &str) -> std::io::Result<()> {
        for object in &export.objects {
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                csv_field(&export.scene_name),
                csv_field(img_path),
                csv_field(&export.rule),
                csv_field(&export.query),
                csv_field(&object.name),
                object.bbox_min[0],
                object.bbox_min[1],
                object.bbox_min[2],
                object.bbox_max[0],
                object.bbox_max[1],
                object.bbox_max[2],
                object.position[0],
                object.position[1],
                object.position[2],
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
