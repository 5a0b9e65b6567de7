//! Testing utilities for the mocap switcher workspace
//!
//! Scene and mocap fixtures shared by integration tests.

#![allow(missing_docs)]

use mocap_document::SceneDocument;
use serde_json::{json, Map, Value};

pub const PERSON_ID: &str = "Person";
pub const CORE_CONTROL_ID: &str = "CoreControl";
pub const TIMING_MASTER_ID: &str = "MotionAnimationMaster";

/// Animation ids with their control ids, one per naming rule
pub const SAMPLE_PAIRS: [(&str, &str); 3] = [
    ("headAnimation", "headControl"),
    ("lHandAnimation", "lHandControl"),
    ("eyeTargetControlAnimation", "eyeTargetControl"),
];

pub fn control(id: &str, tag: &str) -> Value {
    json!({ "id": id, "position": { "x": tag, "y": "0", "z": "0" }, "on": "true" })
}

pub fn animation(id: &str, steps: usize, tag: &str) -> Value {
    let steps: Vec<Value> = (0..steps)
        .map(|i| json!({ "timeStep": i.to_string(), "position": { "x": tag } }))
        .collect();
    json!({ "id": id, "steps": steps })
}

pub fn timing_master(playback_counter: &str) -> Value {
    json!({
        "id": TIMING_MASTER_ID,
        "autoPlay": "false",
        "loop": "true",
        "playbackCounter": playback_counter,
        "startTimestep": "1.5",
        "stopTimestep": "10",
        "loopbackTime": "0",
        "playbackSpeed": "1",
        "recordedLength": "10",
        "triggers": [{ "displayName": "scene trigger" }]
    })
}

pub fn core_control_atom(records: Vec<Value>) -> Value {
    json!({ "id": CORE_CONTROL_ID, "type": "CoreControl", "storables": records })
}

pub fn person_atom(id: &str, records: Vec<Value>) -> Value {
    json!({ "id": id, "type": "Person", "on": "true", "storables": records })
}

pub fn unrelated_atom(index: usize) -> Value {
    json!({
        "id": format!("Prop{index}"),
        "type": "Cube",
        "position": { "x": index.to_string() },
        "storables": [
            control("control", "prop"),
            control("headControl", "not-a-person"),
            animation("headAnimation", 1, "not-a-person")
        ]
    })
}

/// `control` first, then control + animation for every sample pair
pub fn sample_person_records(tag: &str, steps: usize) -> Vec<Value> {
    let mut records = vec![control("control", tag), json!({ "id": "geometry", "morphs": [] })];
    for (animation_id, control_id) in SAMPLE_PAIRS {
        records.push(control(control_id, tag));
        records.push(animation(animation_id, steps, tag));
    }
    records
}

#[derive(Debug, Default)]
pub struct SceneBuilder {
    fields: Map<String, Value>,
    atoms: Vec<Value>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn atom(mut self, atom: Value) -> Self {
        self.atoms.push(atom);
        self
    }

    pub fn core_control(self, playback_counter: &str) -> Self {
        self.atom(core_control_atom(vec![json!({ "id": "Undo" }), timing_master(playback_counter)]))
    }

    pub fn person(self, records: Vec<Value>) -> Self {
        self.atom(person_atom(PERSON_ID, records))
    }

    pub fn unrelated(mut self, count: usize) -> Self {
        self.atoms.extend((0..count).map(unrelated_atom));
        self
    }

    pub fn build_value(self) -> Value {
        let mut root = self.fields;
        root.insert("atoms".to_string(), Value::Array(self.atoms));
        Value::Object(root)
    }

    pub fn build(self) -> SceneDocument {
        SceneDocument::from_value(self.build_value()).unwrap()
    }
}

pub fn sample_scene() -> SceneDocument {
    SceneBuilder::new()
        .field("version", json!("1.20.77.9"))
        .core_control("57")
        .person(sample_person_records("scene", 2))
        .unrelated(2)
        .build()
}

pub fn sample_mocap() -> Value {
    json!({
        "CoreControl": { "storables": [{
            "id": TIMING_MASTER_ID,
            "autoPlay": "true",
            "loop": "false",
            "playbackCounter": "8",
            "startTimestep": "4",
            "stopTimestep": "22.5",
            "loopbackTime": "2",
            "playbackSpeed": "0.5",
            "recordedLength": "22.5",
            "triggers": []
        }]},
        "Person": { "storables": mocap_person_records("mocap") }
    })
}

/// Person section in export order: `control`, then animation before control
pub fn mocap_person_records(tag: &str) -> Vec<Value> {
    let mut records = vec![control("control", tag)];
    for (animation_id, control_id) in SAMPLE_PAIRS {
        records.push(animation(animation_id, 3, tag));
        records.push(control(control_id, tag));
    }
    records
}

pub fn record_ids(scene: &SceneDocument, atom_id: &str) -> Vec<String> {
    scene
        .atom(atom_id)
        .map(|atom| atom.record_ids().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}
