//! Scripted two-combatant encounter played against the bundled content.

use anyhow::{Context, Result};
use gameplay_core::{
    AbilityId, Attribute, AttributeSet, EntityId, EntitySpec, Request, SlotPressed,
};
use gameplay_runtime::{Runtime, RuntimeHandle};

const FIREBALL: AbilityId = AbilityId(1);
const VENOM_STRIKE: AbilityId = AbilityId(2);
const PURIFY: AbilityId = AbilityId(3);
const HOLY_SHIELD: AbilityId = AbilityId(4);

const TOTAL_TICKS: u64 = 28;

#[derive(Clone, Copy, Debug)]
enum Actor {
    Mage,
    Brute,
}

/// One slot press, processed by step `tick`.
struct Cue {
    tick: u64,
    actor: Actor,
    slot: u8,
    target: Actor,
}

const SCRIPT: &[Cue] = &[
    Cue { tick: 2, actor: Actor::Mage, slot: 0, target: Actor::Brute },
    Cue { tick: 3, actor: Actor::Brute, slot: 0, target: Actor::Mage },
    Cue { tick: 4, actor: Actor::Mage, slot: 2, target: Actor::Mage },
    Cue { tick: 7, actor: Actor::Brute, slot: 0, target: Actor::Mage },
    // Still on cooldown: gated silently.
    Cue { tick: 8, actor: Actor::Mage, slot: 0, target: Actor::Brute },
    Cue { tick: 9, actor: Actor::Mage, slot: 1, target: Actor::Brute },
    Cue { tick: 20, actor: Actor::Mage, slot: 0, target: Actor::Brute },
];

pub struct Summary {
    pub ticks: u64,
    pub state_root: [u8; 32],
    pub lines: Vec<String>,
}

struct Cast {
    mage: EntityId,
    brute: EntityId,
}

impl Cast {
    fn id(&self, actor: Actor) -> EntityId {
        match actor {
            Actor::Mage => self.mage,
            Actor::Brute => self.brute,
        }
    }
}

pub async fn run(runtime: &Runtime) -> Result<Summary> {
    let handle = runtime.handle();
    let cast = Cast {
        mage: handle.spawn_entity(mage()).await?,
        brute: handle.spawn_entity(brute()).await?,
    };
    tracing::info!("spawned mage {} and brute {}", cast.mage, cast.brute);

    let mut ticks = 0;
    for tick in 1..=TOTAL_TICKS {
        for cue in SCRIPT.iter().filter(|cue| cue.tick == tick) {
            let request = Request::SlotPressed(SlotPressed {
                slot: cue.slot,
                target: Some(cast.id(cue.target)),
            });
            handle
                .submit(cast.id(cue.actor), request)
                .await
                .with_context(|| format!("submitting cue for tick {tick}"))?;
            tracing::debug!("{:?} presses slot {} on {:?}", cue.actor, cue.slot, cue.target);
        }
        let report = runtime.step().await?;
        ticks = report.tick;
    }

    let lines = vec![
        describe(&handle, "mage", cast.mage).await?,
        describe(&handle, "brute", cast.brute).await?,
    ];
    let state_root = handle.state_root().await?;

    Ok(Summary {
        ticks,
        state_root,
        lines,
    })
}

async fn describe(handle: &RuntimeHandle, name: &str, id: EntityId) -> Result<String> {
    let entity = handle.entity_snapshot(id).await?;
    let attributes = &entity.attributes;
    Ok(format!(
        "{name} {id}: health {:.1}/{:.1}, mana {:.1}/{:.1}, defense {:.1}, {} active effects, {} tags",
        attributes.get(Attribute::Health),
        attributes.get(Attribute::MaxHealth),
        attributes.get(Attribute::Mana),
        attributes.get(Attribute::MaxMana),
        attributes.get(Attribute::Defense),
        entity.effects.len(),
        entity.tags.active_tags().len(),
    ))
}

fn mage() -> EntitySpec {
    EntitySpec::new(
        AttributeSet::new()
            .with(Attribute::MaxHealth, 120.0)
            .with(Attribute::Health, 120.0)
            .with(Attribute::MaxMana, 100.0)
            .with(Attribute::Mana, 100.0)
            .with(Attribute::Defense, 2.0),
    )
    .grant(FIREBALL, Some(0))
    .grant(PURIFY, Some(1))
    .grant(HOLY_SHIELD, Some(2))
}

fn brute() -> EntitySpec {
    EntitySpec::new(
        AttributeSet::new()
            .with(Attribute::MaxHealth, 150.0)
            .with(Attribute::Health, 150.0)
            .with(Attribute::Attack, 12.0)
            .with(Attribute::Defense, 6.0),
    )
    .grant(VENOM_STRIKE, Some(0))
}
