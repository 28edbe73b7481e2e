use serde::{Deserialize, Serialize};

/// Position in world units. `y` is elevation and is ignored by the 2D map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub z: f64,
}

impl WorldPosition {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// `(0, 0)` on the horizontal plane means the server has no position yet.
    pub fn is_unknown(&self) -> bool {
        self.x == 0.0 && self.z == 0.0
    }
}

/// A player on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "steam_id")]
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "avatar", default)]
    pub avatar_ref: Option<String>,
    #[serde(rename = "position")]
    pub world_position: WorldPosition,
    #[serde(rename = "team", default)]
    pub team_id: Option<String>,
}

impl Entity {
    pub fn has_known_position(&self) -> bool {
        !self.world_position.is_unknown()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monument {
    pub name: String,
    #[serde(flatten)]
    pub world_position: WorldPosition,
    #[serde(rename = "type", default)]
    pub category: String,
}

/// One complete fetch result. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SnapshotWire")]
pub struct MapSnapshot {
    pub background_image_ref: String,
    pub world_size: f64,
    pub entities: Vec<Entity>,
    pub monuments: Vec<Monument>,
    pub server_label: String,
    pub online_count: u32,
}

impl MapSnapshot {
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn contains_entity(&self, id: &str) -> bool {
        self.entity(id).is_some()
    }
}

#[derive(Deserialize)]
struct SnapshotWire {
    image_url: String,
    world_size: f64,
    #[serde(default)]
    players: Vec<Entity>,
    #[serde(default)]
    monuments: Vec<Monument>,
    #[serde(default)]
    server_name: String,
    #[serde(default)]
    online: Option<u32>,
}

impl From<SnapshotWire> for MapSnapshot {
    fn from(wire: SnapshotWire) -> Self {
        let online_count = wire
            .online
            .unwrap_or_else(|| u32::try_from(wire.players.len()).unwrap_or(u32::MAX));
        Self {
            background_image_ref: wire.image_url,
            world_size: wire.world_size,
            entities: wire.players,
            monuments: wire.monuments,
            server_label: wire.server_name,
            online_count,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn entity(id: &str, x: f64, z: f64) -> Entity {
        Entity {
            id: id.to_string(),
            display_name: format!("player-{id}"),
            avatar_ref: None,
            world_position: WorldPosition::new(x, 0.0, z),
            team_id: None,
        }
    }

    pub fn monument(name: &str, x: f64, z: f64) -> Monument {
        Monument {
            name: name.to_string(),
            world_position: WorldPosition::new(x, 0.0, z),
            category: "monument".to_string(),
        }
    }

    pub fn snapshot(entities: Vec<Entity>, monuments: Vec<Monument>) -> MapSnapshot {
        MapSnapshot {
            background_image_ref: "/maps/4000.png".to_string(),
            world_size: 4000.0,
            online_count: entities.len() as u32,
            entities,
            monuments,
            server_label: "Test Server".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_payload() {
        let json = r#"{
            "image_url": "https://cdn.example.com/maps/4000.png",
            "world_size": 4000,
            "players": [
                {
                    "steam_id": "76561198000000001",
                    "name": "Alice",
                    "avatar": "https://cdn.example.com/a.jpg",
                    "position": { "x": 1000.0, "y": 12.5, "z": -500.0 },
                    "team": "t1"
                },
                {
                    "steam_id": "76561198000000002",
                    "name": "Bob",
                    "avatar": null,
                    "position": { "x": 0, "y": 0, "z": 0 },
                    "team": null
                }
            ],
            "monuments": [
                { "name": "Large Oil Rig", "x": -1200, "y": 0, "z": 800, "type": "oil_rig" }
            ],
            "server_name": "EU Main",
            "online": 37
        }"#;

        let snapshot: MapSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.world_size, 4000.0);
        assert_eq!(snapshot.server_label, "EU Main");
        assert_eq!(snapshot.online_count, 37);
        assert_eq!(snapshot.entities.len(), 2);

        let alice = &snapshot.entities[0];
        assert_eq!(alice.id, "76561198000000001");
        assert_eq!(alice.team_id.as_deref(), Some("t1"));
        assert_eq!(alice.world_position, WorldPosition::new(1000.0, 12.5, -500.0));
        assert!(!snapshot.entities[1].has_known_position());

        let rig = &snapshot.monuments[0];
        assert_eq!(rig.category, "oil_rig");
        assert_eq!(rig.world_position.x, -1200.0);
    }

    #[test]
    fn missing_online_defaults_to_player_count() {
        let json = r#"{
            "image_url": "/m.png",
            "world_size": 3000,
            "players": [
                { "steam_id": "1", "name": "a", "position": { "x": 1, "z": 2 } }
            ]
        }"#;
        let snapshot: MapSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.online_count, 1);
        assert!(snapshot.monuments.is_empty());
        assert_eq!(snapshot.server_label, "");
    }

    #[test]
    fn sentinel_position_is_unknown_but_entity_stays() {
        let snapshot = fixtures::snapshot(
            vec![
                fixtures::entity("a", 0.0, 0.0),
                fixtures::entity("b", 10.0, 0.0),
            ],
            Vec::new(),
        );
        let known: Vec<_> = snapshot
            .entities
            .iter()
            .filter(|e| e.has_known_position())
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(known, ["b"]);
        assert!(snapshot.contains_entity("a"));
    }
}
