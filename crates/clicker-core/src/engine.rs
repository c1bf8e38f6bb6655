//! The command engine: the only code that mutates a `TeamState`
//!
//! Each call to [`Engine::handle`] or [`Engine::tick`] runs to completion
//! and returns the side effects as a [`Cmd`]. The host owns the engine
//! exclusively (one writer), which makes every check-then-debit atomic.

use crate::action::Action;
use crate::boss::{BossPhase, DamageSource};
use crate::catalog::{boss_for_level, power_up, Harvest, EQUIPMENT};
use crate::cmd::{Cmd, SyncKind};
use crate::config::EngineConfig;
use crate::economy::{
    add_progress, auto_click_rate, boss_damage, buy_garden_upgrade, buy_prestige_upgrade,
    buy_upgrade, click_value, collect_harvest, crit_chance, plant_seed, CRIT_MULTIPLIER,
};
use crate::event::{BossResult, EquipmentDrop, Event, ForgeReply, MergeReply, Reply};
use crate::forge::attempt_forge;
use crate::fusion::fuse;
use crate::prestige::prestige;
use crate::rng::{Dice, GameRng};
use crate::team::TeamState;
use crate::time::{secs, Millis, TimedBuff};
use crate::{Error, PlayerId, Result};

/// Name shown for auto-click damage in boss updates
pub const AUTO_CLICK_NAME: &str = "Auto-clickers";

/// Result of an update cycle
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    /// Commands to execute
    pub cmd: Cmd,
}

impl UpdateResult {
    pub fn new() -> Self {
        Self { cmd: Cmd::None }
    }

    pub fn with_cmd(cmd: Cmd) -> Self {
        Self { cmd }
    }
}

impl Default for UpdateResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands gathered during one update, with at most one state sync
#[derive(Debug, Default)]
struct Effects {
    cmds: Vec<Cmd>,
    sync: Option<SyncKind>,
}

impl Effects {
    fn push(&mut self, cmd: Cmd) {
        self.cmds.push(cmd);
    }

    fn full(&mut self) {
        self.sync = Some(SyncKind::Full);
    }

    fn delta(&mut self) {
        if self.sync.is_none() {
            self.sync = Some(SyncKind::Delta);
        }
    }

    fn merge(&mut self, other: Effects) {
        self.cmds.extend(other.cmds);
        match other.sync {
            Some(SyncKind::Full) => self.full(),
            Some(SyncKind::Delta) => self.delta(),
            None => {}
        }
    }

    fn finish(mut self) -> Cmd {
        if let Some(kind) = self.sync {
            self.cmds.push(Cmd::Sync(kind));
        }
        Cmd::batch(self.cmds)
    }
}

/// Which reply shape a failed action answers with
#[derive(Debug, Clone, Copy)]
enum ReplyKind {
    Forge,
    Merge,
    Discard,
    Generic(&'static str),
}

impl ReplyKind {
    fn of(action: &Action) -> Self {
        match action {
            Action::ForgeItem { .. } => ReplyKind::Forge,
            Action::MergeItems { .. } => ReplyKind::Merge,
            Action::DiscardItem { .. } => ReplyKind::Discard,
            other => ReplyKind::Generic(other.name()),
        }
    }

    fn failure(self, err: &Error) -> Reply {
        let message = err.to_string();
        match self {
            ReplyKind::Forge => Reply::ForgeResult(ForgeReply::from(err)),
            ReplyKind::Merge => Reply::MergingResult(MergeReply {
                success: false,
                new_item: None,
                message: Some(message),
            }),
            ReplyKind::Discard => Reply::DiscardResult {
                success: false,
                message,
            },
            ReplyKind::Generic(action) => Reply::ActionResult {
                action: action.to_string(),
                success: false,
                message,
            },
        }
    }
}

fn ok_reply(action: &str, message: impl Into<String>) -> Reply {
    Reply::ActionResult {
        action: action.to_string(),
        success: true,
        message: message.into(),
    }
}

/// Authoritative game engine
pub struct Engine<D = GameRng> {
    team: TeamState,
    config: EngineConfig,
    dice: D,
    last_tick: Option<Millis>,
}

impl Engine<GameRng> {
    /// Create an engine with a fresh team
    pub fn new(config: EngineConfig) -> Self {
        let team = TeamState::new(config.first_level_requirement);
        Self::restore(config, team)
    }

    /// Resume from a previously saved team state
    ///
    /// The random source starts over from `config.seed`; use [`Engine::resume`]
    /// when the saved generator state is available.
    pub fn restore(config: EngineConfig, team: TeamState) -> Self {
        let dice = GameRng::new(config.seed);
        Self::resume(config, team, dice)
    }

    /// Resume a saved team together with its saved random state, so rolls
    /// continue the sequence instead of replaying it
    pub fn resume(config: EngineConfig, mut team: TeamState, rng: GameRng) -> Self {
        team.after_restore();
        Self::with_dice(config, team, rng)
    }
}

impl<D: Dice> Engine<D> {
    /// Create an engine drawing from a specific random source
    pub fn with_dice(config: EngineConfig, team: TeamState, dice: D) -> Self {
        Self {
            team,
            config,
            dice,
            last_tick: None,
        }
    }

    pub fn team(&self) -> &TeamState {
        &self.team
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The random source, for snapshotting
    pub fn dice(&self) -> &D {
        &self.dice
    }

    /// Apply one player action
    ///
    /// Failures never escape: they become a `success: false` reply plus a
    /// notification for the acting player, and leave the state untouched.
    pub fn handle(&mut self, player: PlayerId, action: Action, now: Millis) -> UpdateResult {
        let kind = ReplyKind::of(&action);
        let mut effects = self.enforce_deadline(now);

        match self.dispatch(player, action, now) {
            Ok(done) => {
                effects.merge(done);
                effects.merge(self.check_achievements());
            }
            Err(err) => {
                let message = err.to_string();
                effects.push(Cmd::reply(player, kind.failure(&err)));
                effects.push(Cmd::notify(player, message));
                effects.push(Cmd::debug(format!(
                    "{} rejected for {} ({:?}): {}",
                    kind_name(kind),
                    player,
                    err.kind(),
                    err
                )));
            }
        }
        UpdateResult::with_cmd(effects.finish())
    }

    /// Advance timers to `now`
    ///
    /// Credits auto-click income for the time since the previous tick,
    /// expires power-ups and buffs, and times out an overdue boss even when
    /// nobody is connected.
    pub fn tick(&mut self, now: Millis) -> UpdateResult {
        let elapsed = self.last_tick.map_or(0, |t| now.saturating_sub(t));
        self.last_tick = Some(now);
        let mut effects = Effects::default();

        for id in self.team.power_ups.sweep(now) {
            let name = power_up(&id).map_or(id.as_str(), |d| d.name);
            effects.push(Cmd::notify_all(format!("{} wore off", name)));
            effects.full();
        }
        if self.team.victory_buff.is_some_and(|b| !b.is_active(now)) {
            self.team.victory_buff = None;
            effects.full();
        }

        let income = auto_click_rate(&self.team, now) * elapsed as f64 / 1_000.0;
        if income > 0.0 {
            self.team.earn(income);
            effects.delta();
            let reached = add_progress(&mut self.team, income, &self.config);
            effects.merge(self.on_levels(&reached, now));

            if self.team.boss.is_active() {
                let raw = income * self.config.auto_click_boss_weight;
                let damage = boss_damage(&self.team, None, raw, now);
                effects.merge(self.hit_boss(DamageSource::AutoClick, AUTO_CLICK_NAME, damage, now));
            }
        }

        effects.merge(self.enforce_deadline(now));
        effects.merge(self.check_achievements());
        UpdateResult::with_cmd(effects.finish())
    }

    fn dispatch(&mut self, player: PlayerId, action: Action, now: Millis) -> Result<Effects> {
        let mut fx = Effects::default();
        match action {
            Action::AddPlayer { name } => {
                let capacity = self.config.inventory_capacity;
                let record = self.team.add_player(player, name, capacity)?;
                let joined = format!("{} joined the team", record.name);
                fx.push(Cmd::reply(player, Reply::Joined { player_id: player }));
                fx.push(Cmd::info(format!("{} ({})", joined, player)));
                fx.push(Cmd::notify_all(joined));
                fx.full();
            }
            Action::RemovePlayer => {
                let record = self.team.remove_player(player)?;
                fx.push(Cmd::info(format!("{} ({}) left", record.name, player)));
                fx.push(Cmd::notify_all(format!("{} left the team", record.name)));
                fx.full();
            }
            Action::SelectCharacter { class } => {
                let record = self.team.player_mut(player)?;
                record.character = Some(class);
                let mismatched: Vec<_> = record
                    .slots
                    .iter()
                    .filter(|(_, id)| {
                        record
                            .inventory
                            .get(*id)
                            .is_some_and(|item| item.weapon.wielder() != class)
                    })
                    .map(|(slot, _)| slot)
                    .collect();
                for slot in mismatched {
                    record.slots.clear(slot);
                }
                fx.push(Cmd::reply(player, ok_reply("selectCharacter", format!("You are now a {:?}", class))));
                fx.full();
            }
            Action::Click { boss } => fx.merge(self.click(player, boss, now)?),
            Action::BuyUpgrade { id } => {
                let level = buy_upgrade(&mut self.team, &id)?;
                fx.push(Cmd::reply(player, ok_reply("buyUpgrade", format!("{} is now level {}", id, level))));
                fx.full();
            }
            Action::BuyPrestigeUpgrade { id } => {
                buy_prestige_upgrade(&mut self.team, &id)?;
                fx.push(Cmd::reply(player, ok_reply("buyPrestigeUpgrade", format!("Unlocked {}", id))));
                fx.push(Cmd::Persist);
                fx.full();
            }
            Action::BuyGardenUpgrade { upgrade_id } => {
                let level = buy_garden_upgrade(&mut self.team, &upgrade_id)?;
                fx.push(Cmd::reply(
                    player,
                    ok_reply("buyGardenUpgrade", format!("{} is now level {}", upgrade_id, level)),
                ));
                fx.full();
            }
            Action::ForgeItem { item_id } => {
                let outcome = attempt_forge(&mut self.team, player, item_id, &mut self.dice)?;
                fx.push(Cmd::info(format!(
                    "{} forged {} ({} -> {}): {}",
                    player,
                    item_id,
                    outcome.old_rarity,
                    outcome.attempted_rarity,
                    if outcome.success { "success" } else { "destroyed" }
                )));
                fx.push(Cmd::reply(player, Reply::ForgeResult(ForgeReply::from(&outcome))));
                fx.push(Cmd::notify(player, outcome.message));
                fx.full();
            }
            Action::MergeItems { item_id1, item_id2 } => {
                let new_id = self.team.allocate_item_id();
                let record = self.team.player_mut(player)?;
                let fused = fuse(record, item_id1, item_id2, new_id)?;
                self.team.stats.items_fused += 1;
                fx.push(Cmd::notify(
                    player,
                    format!("Fused two items into a {} {}", fused.rarity, fused.name),
                ));
                fx.push(Cmd::reply(
                    player,
                    Reply::MergingResult(MergeReply {
                        success: true,
                        new_item: Some(fused),
                        message: None,
                    }),
                ));
                fx.full();
            }
            Action::EquipItem { item_id, slot } => {
                self.team.player_mut(player)?.equip(item_id, slot)?;
                fx.push(Cmd::reply(player, ok_reply("equipItem", format!("Equipped {}", item_id))));
                fx.full();
            }
            Action::UnequipItem { item_id, slot } => {
                self.team.player_mut(player)?.unequip(item_id, slot)?;
                fx.push(Cmd::reply(player, ok_reply("unequipItem", format!("Unequipped {}", item_id))));
                fx.full();
            }
            Action::DiscardItem { item_id } => {
                let item = self.team.player_mut(player)?.remove_item(item_id)?;
                fx.push(Cmd::reply(
                    player,
                    Reply::DiscardResult {
                        success: true,
                        message: format!("Discarded {}", item.name),
                    },
                ));
                fx.full();
            }
            Action::ActivatePowerUp { id } => {
                let def = power_up(&id).ok_or_else(|| Error::UnknownDefinition(id.clone()))?;
                if self.team.power_ups.is_active(def.id, now) {
                    return Err(Error::invalid(format!("{} is already active", def.name)));
                }
                self.team.coins.debit(def.cost)?;
                let state = self.team.power_ups.activate(def, now)?;
                fx.push(Cmd::broadcast(Event::PowerUpActivated {
                    id: def.id.to_string(),
                    name: def.name.to_string(),
                    expires_at: state.expires_at,
                }));
                fx.full();
            }
            Action::SurrenderBoss => {
                self.team.boss.surrender(now)?;
                let name = self.team.player(player).map(|p| p.name.clone()).unwrap_or_default();
                fx.push(Cmd::info(format!("{} surrendered the boss fight", name)));
                fx.merge(self.resolve_boss(now));
            }
            Action::Prestige => {
                let outcome = prestige(&mut self.team, &self.config)?;
                fx.push(Cmd::notify_all(format!(
                    "The team prestiged and earned {} fragments",
                    outcome.fragments
                )));
                fx.push(Cmd::info(format!("prestige run {}", outcome.runs)));
                fx.push(Cmd::Persist);
                fx.full();
            }
            Action::PlantSeed { slot_id, seed_type } => {
                plant_seed(&mut self.team, slot_id, seed_type, now)?;
                fx.push(Cmd::reply(player, ok_reply("plantSeed", format!("Planted {:?} in plot {}", seed_type, slot_id))));
                fx.full();
            }
            Action::HarvestPlant { slot_id } => {
                let harvest = self.team.garden.harvest(slot_id, now)?;
                collect_harvest(&mut self.team, harvest);
                fx.push(Cmd::reply(player, ok_reply("harvestPlant", describe(harvest))));
                fx.full();
            }
            Action::HarvestAllPlants => {
                let harvested = self.team.garden.harvest_all(now);
                if harvested.is_empty() {
                    return Err(Error::invalid("nothing is ready to harvest"));
                }
                let summary: Vec<String> = harvested.iter().map(|(_, h)| describe(*h)).collect();
                for (_, harvest) in harvested {
                    collect_harvest(&mut self.team, harvest);
                }
                fx.push(Cmd::reply(player, ok_reply("harvestAllPlants", summary.join(", "))));
                fx.full();
            }
        }
        Ok(fx)
    }

    fn click(&mut self, player: PlayerId, on_boss: bool, now: Millis) -> Result<Effects> {
        let mut fx = Effects::default();
        let record = self.team.player(player)?;
        let mut value = click_value(&self.team, record, now);
        let mut damage = boss_damage(&self.team, Some(record), value, now);
        let name = record.name.clone();

        // only crit-capable gear draws from the dice
        let chance = crit_chance(record);
        if chance > 0.0 && self.dice.chance(chance) {
            value *= CRIT_MULTIPLIER;
            damage *= CRIT_MULTIPLIER;
        }

        self.team.earn(value);
        self.team.stats.total_clicks += 1;
        let clicks_per_level = self.config.clicks_per_level;
        self.team.player_mut(player)?.record_click(value, clicks_per_level);
        fx.delta();

        let reached = add_progress(&mut self.team, value, &self.config);
        fx.merge(self.on_levels(&reached, now));

        if on_boss && self.team.boss.is_active() {
            fx.merge(self.hit_boss(DamageSource::Player(player), &name, damage, now));
        }
        Ok(fx)
    }

    /// Announce new levels and spawn a boss on every cadence multiple
    fn on_levels(&mut self, reached: &[u32], now: Millis) -> Effects {
        let mut fx = Effects::default();
        for &level in reached {
            fx.push(Cmd::notify_all(format!("The team reached level {}", level)));
            fx.full();
            if level % self.config.boss_every_levels.max(1) == 0 && !self.team.boss.is_active() {
                fx.merge(self.spawn_boss(level, now));
            }
        }
        fx
    }

    fn spawn_boss(&mut self, level: u32, now: Millis) -> Effects {
        let mut fx = Effects::default();
        let def = boss_for_level(level, self.config.boss_every_levels);
        match self
            .team
            .boss
            .spawn(def, level, self.config.boss_health_multiplier, now)
        {
            Ok(boss) => {
                fx.push(Cmd::broadcast(Event::BossSpawn {
                    boss_id: boss.boss_id.clone(),
                    name: boss.name.clone(),
                    level: boss.level,
                    max_health: boss.max_health,
                    deadline: boss.deadline,
                }));
                fx.push(Cmd::notify_all(format!("{} appeared!", boss.name)));
                fx.push(Cmd::info(format!("spawned {} at level {}", boss.boss_id, level)));
                fx.full();
            }
            Err(err) => fx.push(Cmd::warn(format!("boss spawn skipped: {}", err))),
        }
        fx
    }

    /// Apply one already-scaled hit and broadcast the running total
    fn hit_boss(&mut self, source: DamageSource, who: &str, damage: f64, now: Millis) -> Effects {
        let mut fx = Effects::default();
        match self.team.boss.apply_damage(source, damage, now) {
            Ok(report) => {
                fx.push(Cmd::broadcast(Event::BossUpdate {
                    health: report.health,
                    max_health: report.max_health,
                    damage: report.damage,
                    player_name: who.to_string(),
                }));
                if report.defeated {
                    fx.merge(self.resolve_boss(now));
                }
            }
            Err(Error::Expired) => fx.merge(self.enforce_deadline(now)),
            Err(err) => fx.push(Cmd::debug(format!("boss hit ignored: {}", err))),
        }
        fx
    }

    fn enforce_deadline(&mut self, now: Millis) -> Effects {
        if self.team.boss.check_deadline(now) {
            self.resolve_boss(now)
        } else {
            Effects::default()
        }
    }

    /// Pay out or penalize a finished encounter and return to idle
    fn resolve_boss(&mut self, now: Millis) -> Effects {
        let mut fx = Effects::default();
        let Some(resolved) = self.team.boss.finish() else {
            return fx;
        };
        let duration = resolved.duration() as f64 / 1_000.0;

        if resolved.outcome == BossPhase::Victory {
            let coins = resolved.boss.reward_coins;
            self.team.earn(coins as f64);
            self.team.stats.bosses_defeated += 1;
            let multiplier = self.config.victory_multiplier;
            self.team.victory_buff = Some(TimedBuff::new(
                multiplier,
                now,
                secs(self.config.victory_buff_secs),
            ));

            let recipient = resolved
                .boss
                .top_damage_dealer(|id| self.team.players.contains_key(&id));
            let equipment_drop = recipient.and_then(|to| self.roll_drop(to, &mut fx));

            fx.push(Cmd::broadcast(Event::BossResult(BossResult::Victory {
                victory: true,
                coins,
                multiplier,
                duration,
                equipment_drop,
            })));
            fx.push(Cmd::notify_all(format!(
                "{} was defeated! +{} coins and x{} clicks",
                resolved.boss.name, coins, multiplier
            )));
            fx.push(Cmd::info(format!(
                "{} defeated in {:.1}s with {} total damage",
                resolved.boss.boss_id, duration, resolved.boss.total_damage
            )));
        } else {
            let surrendered = resolved.outcome == BossPhase::Surrendered;
            let penalty = self.team.coins.take_fraction(self.config.defeat_penalty);
            fx.push(Cmd::broadcast(Event::BossResult(BossResult::Defeat {
                victory: false,
                surrendered,
                penalty,
            })));
            fx.push(Cmd::notify_all(format!(
                "{} {}. The team lost {} coins",
                resolved.boss.name,
                if surrendered { "was left standing" } else { "escaped" },
                penalty
            )));
            fx.push(Cmd::info(format!(
                "{} {:?} after {:.1}s",
                resolved.boss.boss_id, resolved.outcome, duration
            )));
        }
        fx.push(Cmd::Persist);
        fx.full();
        fx
    }

    /// Roll for loot and hand it to `recipient`
    ///
    /// A full inventory rejects the item; the rejection is reported, never
    /// silently dropped.
    fn roll_drop(&mut self, recipient: PlayerId, fx: &mut Effects) -> Option<EquipmentDrop> {
        if !self.dice.chance(self.config.equipment_drop_chance) {
            return None;
        }
        let def = &EQUIPMENT[self.dice.pick_index(EQUIPMENT.len())?];
        let item = self.team.instantiate(def);
        let record = self.team.player_mut(recipient).ok()?;

        if record.inventory.is_full() {
            fx.push(Cmd::notify(
                recipient,
                format!("Your inventory is full, so the {} was lost", item.name),
            ));
            return Some(EquipmentDrop::Rejected {
                rejected: true,
                reason: "inventory full".to_string(),
                recipient,
                item_name: item.name,
            });
        }
        fx.push(Cmd::notify(recipient, format!("You received {}", item.name)));
        record.inventory.push(item.clone()).ok()?;
        Some(EquipmentDrop::Granted { recipient, item })
    }

    fn check_achievements(&mut self) -> Effects {
        let mut fx = Effects::default();
        let level = self.team.level;
        for def in self.team.achievements.evaluate(&self.team.stats, level) {
            fx.push(Cmd::broadcast(Event::AchievementUnlocked {
                id: def.id.to_string(),
                name: def.name.to_string(),
            }));
            fx.push(Cmd::notify_all(format!("Achievement unlocked: {}", def.name)));
            fx.full();
        }
        fx
    }
}

fn kind_name(kind: ReplyKind) -> &'static str {
    match kind {
        ReplyKind::Forge => "forgeItem",
        ReplyKind::Merge => "mergeItems",
        ReplyKind::Discard => "discardItem",
        ReplyKind::Generic(name) => name,
    }
}

fn describe(harvest: Harvest) -> String {
    match harvest {
        Harvest::Coins(n) => format!("+{} coins", n),
        Harvest::ForgeLuck(n) => format!("+{} forge luck", n),
        Harvest::Fragments(n) => format!("+{} fragments", n),
    }
}
