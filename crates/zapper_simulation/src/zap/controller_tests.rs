//! Tests for ZapController state machine (fake scene, без Bevy App).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::components::{AimSource, Interactable, PlayerId, TriggerEdge};
    use crate::item_system::ItemPayload;
    use crate::layers::{LAYER_ENVIRONMENT, LAYER_ITEMS};
    use crate::zap::{
        CancelReason, ColliderProbe, HapticCue, PresentationCue, ProbeHit, ProbeRay, ZapConfig,
        ZapContext, ZapController, ZapOutput, ZapProbe, ZapperView,
    };

    const DT: f32 = 0.1;

    /// Fake мир: предметы + препятствия + award decision
    struct TestScene {
        items: Vec<(Entity, Vec3, Interactable)>,
        obstacles: Vec<(Entity, Vec3)>,
        accept_awards: bool,
        awards: Vec<(PlayerId, ItemPayload)>,
        outputs: Vec<ZapOutput>,
    }

    impl TestScene {
        fn new() -> Self {
            Self {
                items: Vec::new(),
                obstacles: Vec::new(),
                accept_awards: true,
                awards: Vec::new(),
                outputs: Vec::new(),
            }
        }

        fn add_item(&mut self, index: u32, position: Vec3) -> Entity {
            let entity = Entity::from_raw(index);
            let payload = ItemPayload::new("battery");
            self.items.push((entity, position, Interactable::new(payload)));
            entity
        }

        fn add_obstacle(&mut self, index: u32, position: Vec3) -> Entity {
            let entity = Entity::from_raw(index);
            self.obstacles.push((entity, position));
            entity
        }

        fn item(&self, entity: Entity) -> &Interactable {
            &self.items.iter().find(|(id, _, _)| *id == entity).unwrap().2
        }

        fn move_item(&mut self, entity: Entity, position: Vec3) {
            let item = self.items.iter_mut().find(|(id, _, _)| *id == entity).unwrap();
            item.1 = position;
        }

        fn completions(&self) -> Vec<&ZapOutput> {
            self.outputs
                .iter()
                .filter(|output| matches!(output, ZapOutput::Completed { .. }))
                .collect()
        }

        fn cancellations(&self) -> Vec<CancelReason> {
            self.outputs
                .iter()
                .filter_map(|output| match output {
                    ZapOutput::Cancelled { reason, .. } => Some(*reason),
                    _ => None,
                })
                .collect()
        }

        fn cue_count(&self) -> usize {
            self.outputs
                .iter()
                .filter(|output| matches!(output, ZapOutput::Cue(_)))
                .count()
        }
    }

    impl ZapContext for TestScene {
        fn first_hit(&self, ray: &ProbeRay) -> Option<ProbeHit> {
            let mut probe = ColliderProbe::new();
            for (entity, position, _) in &self.items {
                probe.insert(*entity, *position, 0.5, LAYER_ITEMS);
            }
            for (entity, position) in &self.obstacles {
                probe.insert(*entity, *position, 0.5, LAYER_ENVIRONMENT);
            }
            probe.first_hit(ray)
        }

        fn target_position(&self, target: Entity) -> Option<Vec3> {
            self.items
                .iter()
                .find(|(id, _, _)| *id == target)
                .map(|(_, position, _)| *position)
        }

        fn interactable_mut(&mut self, entity: Entity) -> Option<&mut Interactable> {
            self.items
                .iter_mut()
                .find(|(id, _, _)| *id == entity)
                .map(|(_, _, item)| item)
        }

        fn try_award(&mut self, player: PlayerId, payload: &ItemPayload) -> bool {
            if self.accept_awards {
                self.awards.push((player, payload.clone()));
            }
            self.accept_awards
        }

        fn emit(&mut self, output: ZapOutput) {
            self.outputs.push(output);
        }
    }

    fn zapper() -> Entity {
        Entity::from_raw(100)
    }

    /// Прицел вдоль -Z из начала координат
    fn forward_aim() -> AimSource {
        AimSource::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0)).unwrap()
    }

    fn view<'a>(aim: &'a AimSource, config: &'a ZapConfig) -> ZapperView<'a> {
        ZapperView {
            entity: zapper(),
            player: PlayerId(7),
            aim,
            config,
        }
    }

    #[test]
    fn test_trigger_edges_emit_cues_once() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        assert!(controller.trigger_held);
        assert_eq!(
            scene.outputs,
            vec![
                ZapOutput::Cue(PresentationCue::Particles(true)),
                ZapOutput::Cue(PresentationCue::Audio(true)),
                ZapOutput::Cue(PresentationCue::AnimatorFlag {
                    name: "Shooting".into(),
                    value: true
                }),
            ]
        );

        // Держим без edge — новых cues нет
        for _ in 0..5 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }
        assert_eq!(scene.cue_count(), 3);

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Released), DT, &mut scene);
        assert!(!controller.trigger_held);
        assert_eq!(
            &scene.outputs[3..],
            &[
                ZapOutput::Cue(PresentationCue::Particles(false)),
                ZapOutput::Cue(PresentationCue::Audio(false)),
                ZapOutput::Cue(PresentationCue::AnimatorFlag {
                    name: "Shooting".into(),
                    value: false
                }),
                ZapOutput::Cue(PresentationCue::Haptic(HapticCue::Stop)),
            ]
        );
    }

    #[test]
    fn test_no_acquisition_without_trigger() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
        assert!(scene.outputs.is_empty());
    }

    #[test]
    fn test_acquire_claims_target_and_pulses_haptics() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);

        assert_eq!(controller.target, Some(item));
        assert!(scene.item(item).is_being_zapped);
        assert_eq!(scene.item(item).zapping_owner, Some(zapper()));
        assert!(scene.outputs.contains(&ZapOutput::Cue(PresentationCue::Haptic(
            HapticCue::Pulse {
                motor: 0,
                intensity: 0.3,
                duration: 0.2
            }
        ))));
        assert!(scene.outputs.contains(&ZapOutput::Started {
            target: item,
            claimed_ownership: true
        }));
        // Dwell начинает расти в том же тике
        assert_eq!(controller.dwell_elapsed, DT);
    }

    #[test]
    fn test_obstacle_in_front_blocks_acquisition() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        scene.add_obstacle(2, Vec3::new(0.0, 0.0, -4.0));
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -6.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);

        // Первое попадание — стена, а не предмет
        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
    }

    /// Scenario A: range 10, target на 2м, threshold 1.0, dt 0.1 → completion на 10-м тике
    #[test]
    fn test_scenario_a_completes_after_ten_ticks() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        for _ in 1..9 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }
        assert!(scene.completions().is_empty(), "completion до 10-го тика");
        assert!(controller.dwell_elapsed > 0.85);

        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert_eq!(scene.completions().len(), 1);
        assert_eq!(controller.dwell_elapsed, 0.0);
        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
        assert_eq!(scene.awards, vec![(PlayerId(7), ItemPayload::new("battery"))]);
        assert!(matches!(
            scene.completions()[0],
            ZapOutput::Completed { awarded: true, .. }
        ));
    }

    /// Scenario B: target уходит на 15м (range 10) на 5-м тике → cancel на 5-м тике
    #[test]
    fn test_scenario_b_out_of_range_cancels() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        for _ in 2..5 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }
        let dwell_before = controller.dwell_elapsed;
        assert!((dwell_before - 0.4).abs() < 1e-5);

        // Тик 5
        scene.move_item(item, Vec3::new(0.0, 0.0, -15.0));
        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert_eq!(scene.cancellations(), vec![CancelReason::OutOfRange]);
        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
        // Dwell не сброшен, а начал убывать
        assert!((controller.dwell_elapsed - (dwell_before - DT)).abs() < 1e-5);

        // Дальше только убывает
        let mut previous = controller.dwell_elapsed;
        for _ in 0..10 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
            assert!(controller.dwell_elapsed <= previous);
            assert!(controller.dwell_elapsed >= 0.0);
            previous = controller.dwell_elapsed;
        }
        assert_eq!(controller.dwell_elapsed, 0.0);
    }

    /// Scenario C: отпустили триггер при dwell 0.4 → немедленный cancel, dwell убывает
    #[test]
    fn test_scenario_c_trigger_release_cancels() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        for _ in 1..4 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }
        assert!((controller.dwell_elapsed - 0.4).abs() < 1e-5);

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Released), DT, &mut scene);

        assert_eq!(scene.cancellations(), vec![CancelReason::TriggerReleased]);
        assert!(!scene.item(item).is_being_zapped);
        assert!((controller.dwell_elapsed - 0.3).abs() < 1e-5);

        for _ in 0..3 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }
        assert!(controller.dwell_elapsed.abs() < 1e-5);

        controller.tick(&view(&aim, &config), None, DT, &mut scene);
        assert_eq!(controller.dwell_elapsed, 0.0);
    }

    /// Scenario D: award rejected → предмет не уничтожен, dwell 0, target отпущен
    #[test]
    fn test_scenario_d_rejected_award() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        scene.accept_awards = false;
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        for _ in 1..10 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }

        assert_eq!(scene.completions().len(), 1);
        assert!(matches!(
            scene.completions()[0],
            ZapOutput::Completed { awarded: false, .. }
        ));
        assert_eq!(controller.dwell_elapsed, 0.0);
        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
        assert!(scene.awards.is_empty());
        // Предмет на месте
        assert!(scene.target_position(item).is_some());
    }

    #[test]
    fn test_rejected_item_can_be_reacquired() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        scene.accept_awards = false;
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        for _ in 1..10 {
            controller.tick(&view(&aim, &config), None, DT, &mut scene);
        }
        assert!(controller.target.is_none());

        // Триггер всё ещё держится → следующий тик снова захватывает
        controller.tick(&view(&aim, &config), None, DT, &mut scene);
        assert_eq!(controller.target, Some(item));
        assert!(scene.item(item).is_being_zapped);
    }

    #[test]
    fn test_aim_drift_cancels_with_lost_line_of_sight() {
        let config = ZapConfig::default();
        let mut aim = forward_aim();
        let mut scene = TestScene::new();
        scene.add_item(1, Vec3::new(0.0, 0.0, -6.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        assert!(controller.is_zapping());

        // Поворот прицела на +X
        aim.set(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert_eq!(scene.cancellations(), vec![CancelReason::LostLineOfSight]);
        assert!(!controller.is_zapping());
    }

    #[test]
    fn test_degenerate_aim_skips_acquisition() {
        let config = ZapConfig::default();
        let mut aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        // Muzzle совпадает с aim point — направления нет
        aim.set(Vec3::ZERO, Vec3::ZERO);
        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert!(controller.trigger_held);
        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
        assert_eq!(controller.dwell_elapsed, 0.0);
        assert!(!scene
            .outputs
            .iter()
            .any(|output| matches!(output, ZapOutput::Started { .. })));

        // Прицел снова нормальный → захват в следующем тике
        aim.set(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        controller.tick(&view(&aim, &config), None, DT, &mut scene);
        assert_eq!(controller.target, Some(item));
    }

    #[test]
    fn test_degenerate_aim_while_zapping_cancels() {
        let config = ZapConfig::default();
        let mut aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        assert_eq!(controller.target, Some(item));

        let muzzle = Vec3::new(0.0, 1.0, 0.0);
        aim.set(muzzle, muzzle);
        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert_eq!(scene.cancellations(), vec![CancelReason::LostLineOfSight]);
        assert!(controller.target.is_none());
        assert!(!scene.item(item).is_being_zapped);
        // 0.1 накоплено, cancel → убыл на dt
        assert!(controller.dwell_elapsed.abs() < 1e-6);
    }

    #[test]
    fn test_obstacle_appearing_cancels_zap() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        scene.add_item(1, Vec3::new(0.0, 0.0, -6.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        assert!(controller.is_zapping());

        scene.add_obstacle(2, Vec3::new(0.0, 0.0, -4.0));
        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert_eq!(scene.cancellations(), vec![CancelReason::LostLineOfSight]);
    }

    #[test]
    fn test_vanished_target_cancels_with_target_lost() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        scene.items.clear();
        controller.tick(&view(&aim, &config), None, DT, &mut scene);

        assert_eq!(scene.cancellations(), vec![CancelReason::TargetLost]);
        assert!(controller.target.is_none());
    }

    #[test]
    fn test_cancel_checks_short_circuit_in_order() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);

        // И триггер отпущен, и target вне range → побеждает триггер
        scene.move_item(item, Vec3::new(0.0, 0.0, -15.0));
        controller.trigger_held = false;
        assert_eq!(
            controller.check_target(item, &view(&aim, &config), &scene),
            Err(CancelReason::TriggerReleased)
        );

        // Вне range + вне прицела → побеждает range
        controller.trigger_held = true;
        assert_eq!(
            controller.check_target(item, &view(&aim, &config), &scene),
            Err(CancelReason::OutOfRange)
        );

        scene.move_item(item, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(controller.check_target(item, &view(&aim, &config), &scene), Ok(()));
    }

    #[test]
    fn test_dwell_grows_by_exact_delta_while_zapping() {
        let config = ZapConfig {
            zap_threshold: 5.0,
            ..Default::default()
        };
        let aim = forward_aim();
        let mut scene = TestScene::new();
        scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), 0.25, &mut scene);
        let deltas = [0.25, 0.5, 0.125, 1.0];
        for delta in deltas {
            let before = controller.dwell_elapsed;
            controller.tick(&view(&aim, &config), None, delta, &mut scene);
            assert_eq!(controller.dwell_elapsed, before + delta);
        }
        assert_eq!(controller.progress(&config), 2.125 / 5.0);
    }

    #[test]
    fn test_idle_dwell_never_negative() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let mut controller = ZapController {
            dwell_elapsed: 0.15,
            ..Default::default()
        };

        controller.tick(&view(&aim, &config), None, DT, &mut scene);
        assert!((controller.dwell_elapsed - 0.05).abs() < 1e-6);

        controller.tick(&view(&aim, &config), None, DT, &mut scene);
        assert_eq!(controller.dwell_elapsed, 0.0);

        controller.tick(&view(&aim, &config), None, DT, &mut scene);
        assert_eq!(controller.dwell_elapsed, 0.0);
    }

    #[test]
    fn test_reset_releases_target() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));
        let mut controller = ZapController::default();

        controller.tick(&view(&aim, &config), Some(TriggerEdge::Pressed), DT, &mut scene);
        controller.reset(&mut scene);

        assert!(controller.target.is_none());
        assert!(!controller.trigger_held);
        assert_eq!(controller.dwell_elapsed, 0.0);
        assert!(!scene.item(item).is_being_zapped);
        assert_eq!(scene.cancellations(), vec![CancelReason::Reset]);
    }

    /// Shared zap: второй zapper держит уже занятый предмет.
    ///
    /// Owner не переписывается, `is_being_zapped` — общий флаг: cancel первого
    /// zapper'а сбрасывает его, хотя второй всё ещё держит target.
    #[test]
    fn test_shared_zap_keeps_first_owner() {
        let config = ZapConfig::default();
        let aim = forward_aim();
        let mut scene = TestScene::new();
        let item = scene.add_item(1, Vec3::new(0.0, 0.0, -2.0));

        let first = Entity::from_raw(100);
        let second = Entity::from_raw(200);
        let mut first_controller = ZapController::default();
        let mut second_controller = ZapController::default();

        let first_view = ZapperView {
            entity: first,
            player: PlayerId(1),
            aim: &aim,
            config: &config,
        };
        let second_view = ZapperView {
            entity: second,
            player: PlayerId(2),
            aim: &aim,
            config: &config,
        };

        first_controller.tick(&first_view, Some(TriggerEdge::Pressed), DT, &mut scene);
        second_controller.tick(&second_view, Some(TriggerEdge::Pressed), DT, &mut scene);

        assert_eq!(first_controller.target, Some(item));
        assert_eq!(second_controller.target, Some(item));
        assert_eq!(scene.item(item).zapping_owner, Some(first));
        assert!(scene.outputs.contains(&ZapOutput::Started {
            target: item,
            claimed_ownership: false
        }));

        // Первый отпускает — флаг сброшен, второй продолжает dwell
        first_controller.tick(&first_view, Some(TriggerEdge::Released), DT, &mut scene);
        second_controller.tick(&second_view, None, DT, &mut scene);

        assert!(!scene.item(item).is_being_zapped);
        assert_eq!(second_controller.target, Some(item));
        assert!((second_controller.dwell_elapsed - 0.2).abs() < 1e-5);
        assert_eq!(scene.item(item).zapping_owner, Some(first));
    }
}
