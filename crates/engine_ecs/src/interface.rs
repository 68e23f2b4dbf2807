// crates/engine_ecs/src/interface.rs
use engine_assets::Assets;
use engine_shared::{Clock, InputSource, Logger, Renderer};

use crate::entity::{Entity, EntityId};
use crate::error::{EcsError, EcsResult};
use crate::game::Game;

/// Everything a component hook may reach.
///
/// The application fills in the collaborators it has; `Game` adds itself and
/// the owning entity's path before each hook. Every accessor fails with
/// `MissingCollaborator` instead of panicking when its collaborator is absent.
#[derive(Default)]
pub struct Interface<'a> {
    renderer: Option<&'a mut dyn Renderer>,
    logger: Option<&'a Logger>,
    clock: Option<&'a dyn Clock>,
    input: Option<&'a dyn InputSource>,
    assets: Option<&'a mut Assets>,
    game: Option<&'a mut Game>,
    owner: &'a [EntityId],
}

impl<'a> Interface<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(mut self, renderer: &'a mut dyn Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_logger(mut self, logger: &'a Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_input(mut self, input: &'a dyn InputSource) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_assets(mut self, assets: &'a mut Assets) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Reborrows every collaborator for one hook call on the entity at `owner`.
    pub(crate) fn scoped<'b>(&'b mut self, game: &'b mut Game, owner: &'b [EntityId]) -> Interface<'b> {
        Interface {
            renderer: match self.renderer {
                Some(ref mut r) => Some(&mut **r as &mut dyn Renderer),
                None => None,
            },
            logger: self.logger,
            clock: self.clock,
            input: self.input,
            assets: self.assets.as_deref_mut(),
            game: Some(game),
            owner,
        }
    }

    // --- Renderer ---

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn renderer(&mut self) -> EcsResult<&mut (dyn Renderer + 'a)> {
        self.renderer
            .as_deref_mut()
            .ok_or(EcsError::MissingCollaborator("renderer"))
    }

    // --- Logger ---

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    pub fn logger(&self) -> EcsResult<&'a Logger> {
        self.logger.ok_or(EcsError::MissingCollaborator("logger"))
    }

    // --- Clock ---

    pub fn has_clock(&self) -> bool {
        self.clock.is_some()
    }

    pub fn clock(&self) -> EcsResult<&'a dyn Clock> {
        self.clock.ok_or(EcsError::MissingCollaborator("clock"))
    }

    // --- Input ---

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    pub fn input(&self) -> EcsResult<&'a dyn InputSource> {
        self.input.ok_or(EcsError::MissingCollaborator("input"))
    }

    // --- Assets ---

    pub fn has_assets(&self) -> bool {
        self.assets.is_some()
    }

    pub fn assets(&mut self) -> EcsResult<&mut Assets> {
        self.assets
            .as_deref_mut()
            .ok_or(EcsError::MissingCollaborator("assets"))
    }

    // --- Game and owner ---

    pub fn has_game(&self) -> bool {
        self.game.is_some()
    }

    pub fn game(&self) -> EcsResult<&Game> {
        self.game.as_deref().ok_or(EcsError::MissingCollaborator("game"))
    }

    pub fn game_mut(&mut self) -> EcsResult<&mut Game> {
        self.game
            .as_deref_mut()
            .ok_or(EcsError::MissingCollaborator("game"))
    }

    pub fn has_owner(&self) -> bool {
        !self.owner.is_empty()
    }

    /// Ids from the top-level entity down to the owner.
    pub fn owner_path(&self) -> &[EntityId] {
        self.owner
    }

    pub fn owner_id(&self) -> EcsResult<EntityId> {
        self.owner
            .last()
            .copied()
            .ok_or(EcsError::MissingCollaborator("owner"))
    }

    pub fn owner(&self) -> EcsResult<&Entity> {
        let path = self.owner;
        if path.is_empty() {
            return Err(EcsError::MissingCollaborator("owner"));
        }
        self.game()?.entity_at(path)
    }

    pub fn owner_mut(&mut self) -> EcsResult<&mut Entity> {
        let path = self.owner;
        if path.is_empty() {
            return Err(EcsError::MissingCollaborator("owner"));
        }
        self.game_mut()?.entity_at_mut(path)
    }
}
