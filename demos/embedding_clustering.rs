use equitier::{build_hierarchy, EntitySet};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fifteen points in three loose directions -> teams of 5 -> one group of 3.
    let mut pairs = Vec::new();
    for (axis, name) in ["x", "y", "z"].iter().enumerate() {
        for i in 0..5 {
            let mut v = vec![0.05 * i as f32; 3];
            v[axis] = 1.0;
            pairs.push((format!("{name}{i}"), v));
        }
    }
    let entities = EntitySet::from_pairs(pairs)?;

    let hierarchy = build_hierarchy(entities, &[5, 3])?;

    for level in hierarchy.levels() {
        println!(
            "level {} (size {}): {} clusters",
            level.level,
            level.cluster_size,
            level.clusters.len()
        );
        for cluster in &level.clusters {
            let leaves: Vec<&String> = cluster.leaves();
            println!("  cluster {}: {:?}", cluster.id, leaves);
        }
    }

    println!("{}", hierarchy.to_json_pretty()?);
    Ok(())
}
