//! Tree growth lifecycle validation

use rand::rngs::StdRng;
use rand::SeedableRng;

use eco_city_sim::simulation::{
    foliage_radius, GrowthConfig, GrowthStage, SimId, Tree, TreeId,
};

fn tree(stage: GrowthStage, rng: &mut StdRng) -> Tree {
    Tree::new(
        TreeId(SimId(0)),
        400.0,
        520.0,
        stage,
        &GrowthConfig::default(),
        rng,
    )
}

fn run(tree: &mut Tree, ticks: u32, rng: &mut StdRng) {
    for _ in 0..ticks {
        tree.update(rng);
    }
}

#[test]
fn test_watered_seed_sprouts_after_exactly_180_ticks() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut tree = tree(GrowthStage::Seed, &mut rng);
    tree.water();

    run(&mut tree, 179, &mut rng);
    assert_eq!(tree.stage(), GrowthStage::Seed);
    assert!(tree.is_watered());

    let events = tree.update(&mut rng);
    assert!(events.stage_advanced);
    assert_eq!(tree.stage(), GrowthStage::Sprout);
    assert!(!tree.is_watered(), "growing consumes the water");
    assert_eq!(tree.growth_timer(), 0);
    assert!(tree.reward_pending());
}

#[test]
fn test_dry_tree_never_grows() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut tree = tree(GrowthStage::Seed, &mut rng);
    run(&mut tree, 1000, &mut rng);
    assert_eq!(tree.stage(), GrowthStage::Seed);
    assert_eq!(tree.growth_timer(), 0);
}

#[test]
fn test_rewatering_does_not_reset_growth_timer() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tree = tree(GrowthStage::Sprout, &mut rng);
    tree.water();
    run(&mut tree, 100, &mut rng);

    tree.water();
    tree.water();
    assert_eq!(tree.growth_timer(), 100);

    run(&mut tree, 79, &mut rng);
    assert_eq!(tree.stage(), GrowthStage::Sprout);
    run(&mut tree, 1, &mut rng);
    assert_eq!(tree.stage(), GrowthStage::Young);
}

#[test]
fn test_each_growth_needs_fresh_water() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut tree = tree(GrowthStage::Seed, &mut rng);
    tree.water();
    run(&mut tree, 500, &mut rng);
    assert_eq!(tree.stage(), GrowthStage::Sprout);
}

#[test]
fn test_mature_tree_fruits_after_exactly_300_ticks() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut tree = tree(GrowthStage::Mature, &mut rng);

    run(&mut tree, 299, &mut rng);
    assert!(!tree.has_fruit());
    assert_eq!(tree.fruit_timer(), 299);

    let events = tree.update(&mut rng);
    assert!(events.fruited);
    assert!(tree.has_fruit());
    assert_eq!(tree.fruit_timer(), 0);

    let fruit = tree.fruit_positions();
    assert!((3..=6).contains(&fruit.len()), "got {} fruit", fruit.len());

    let center = tree.foliage_center();
    let radius = foliage_radius(GrowthStage::Mature);
    for position in fruit {
        assert!(
            position.distance(&center) <= radius,
            "fruit at {:?} is outside the foliage",
            position
        );
    }
}

#[test]
fn test_fruit_positions_stay_in_foliage_across_seeds() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = tree(GrowthStage::Mature, &mut rng);
        run(&mut tree, 300, &mut rng);

        let center = tree.foliage_center();
        let radius = foliage_radius(tree.stage());
        assert!((3..=6).contains(&tree.fruit_positions().len()));
        assert!(tree
            .fruit_positions()
            .iter()
            .all(|p| p.distance(&center) <= radius));
    }
}

#[test]
fn test_fruit_timer_stops_while_fruit_hangs() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut tree = tree(GrowthStage::Mature, &mut rng);
    run(&mut tree, 300, &mut rng);
    let fruit = tree.fruit_positions().to_vec();

    run(&mut tree, 1000, &mut rng);
    assert_eq!(tree.fruit_timer(), 0);
    assert_eq!(tree.fruit_positions(), fruit.as_slice());
}

#[test]
fn test_young_trees_never_fruit() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree = tree(GrowthStage::Young, &mut rng);
    run(&mut tree, 1000, &mut rng);
    assert!(!tree.has_fruit());
    assert_eq!(tree.fruit_timer(), 0);
}

#[test]
fn test_mature_growth_still_pays_a_reward() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut tree = tree(GrowthStage::Mature, &mut rng);
    tree.water();
    run(&mut tree, 180, &mut rng);

    assert_eq!(tree.stage(), GrowthStage::Mature);
    assert!(!tree.is_watered());
    assert!(tree.take_reward());
    assert!(!tree.take_reward(), "a reward is paid once");
}

#[test]
fn test_stage_helpers() {
    assert_eq!(GrowthStage::Seed.next(), GrowthStage::Sprout);
    assert_eq!(GrowthStage::Mature.next(), GrowthStage::Mature);
    assert_eq!(GrowthStage::from_index(2), Some(GrowthStage::Young));
    assert_eq!(GrowthStage::from_index(4), None);
    assert_eq!(foliage_radius(GrowthStage::Seed), 20.0);
    assert_eq!(foliage_radius(GrowthStage::Mature), 80.0);
}
