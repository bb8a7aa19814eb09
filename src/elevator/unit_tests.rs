/*
 * Unit tests for the elevator module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 *  - transition functions (motion, step_toward)
 *  - a unit thread driven through mock controller channels
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod unit_tests {
    use crate::config::ElevatorConfig;
    use crate::elevator::unit::{motion, step_toward, Motion};
    use crate::elevator::ElevatorUnit;
    use crate::shared::Direction::{Down, Up};
    use crate::shared::{TargetUpdate, UnitEvent};
    use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
    use std::thread::{spawn, JoinHandle};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(3);

    fn setup_unit(id: usize, tick_ms: u64) -> (JoinHandle<()>, Sender<TargetUpdate>, Receiver<UnitEvent>) {
        // Arrange mock channels
        let (target_tx, target_rx) = unbounded::<TargetUpdate>();
        let (event_tx, event_rx) = unbounded::<UnitEvent>();

        let config = ElevatorConfig { tick_ms };
        let unit = ElevatorUnit::new(id, &config, target_rx, event_tx);

        (spawn(move || unit.run()), target_tx, event_rx)
    }

    fn update(targets: &[u8], ack: bool) -> TargetUpdate {
        TargetUpdate {
            targets: targets.to_vec(),
            ack,
        }
    }

    fn expect_event(event_rx: &Receiver<UnitEvent>) -> UnitEvent {
        match event_rx.recv_timeout(TIMEOUT) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => panic!("Timed out waiting for unit event"),
            Err(e) => panic!("Error receiving from event_rx: {:?}", e),
        }
    }

    #[test]
    fn test_motion() {
        assert_eq!(motion(3, &[]), Motion::Idle);
        assert_eq!(motion(3, &[3, 5]), Motion::Arrived(3));
        assert_eq!(motion(3, &[1, 3]), Motion::Moving(1));
        assert_eq!(motion(0, &[4]), Motion::Moving(4));
    }

    #[test]
    fn test_step_toward() {
        // Direction is what is still needed after the step
        assert_eq!(step_toward(0, 3), (1, Up));
        assert_eq!(step_toward(2, 3), (3, Down));
        assert_eq!(step_toward(5, 2), (4, Down));
        assert_eq!(step_toward(3, 2), (2, Down));
    }

    #[test]
    fn test_unit_travels_and_arrives() {
        // Arrange
        let (unit_thread, target_tx, event_rx) = setup_unit(0, 10);

        // Act
        target_tx.send(update(&[3], false)).unwrap();

        // Assert
        for (floor, direction) in [(1, Up), (2, Up), (3, Down)] {
            assert_eq!(
                expect_event(&event_rx),
                UnitEvent::Move {
                    id: 0,
                    floor,
                    direction
                }
            );
            target_tx.send(update(&[3], true)).unwrap();
        }
        assert_eq!(expect_event(&event_rx), UnitEvent::Arrive { id: 0, floor: 3 });
        target_tx.send(update(&[], true)).unwrap();

        // Idle: nothing more is reported
        assert!(event_rx.recv_timeout(Duration::from_millis(100)).is_err());

        // Cleanup
        drop(target_tx);
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_arrives_without_moving() {
        // Arrange
        let (unit_thread, target_tx, event_rx) = setup_unit(2, 10);

        // Act
        target_tx.send(update(&[0], false)).unwrap();

        // Assert
        assert_eq!(expect_event(&event_rx), UnitEvent::Arrive { id: 2, floor: 0 });

        // Cleanup
        drop(target_tx);
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_waits_for_ack_before_next_report() {
        // Arrange
        let (unit_thread, target_tx, event_rx) = setup_unit(0, 10);
        target_tx.send(update(&[4], false)).unwrap();
        assert_eq!(
            expect_event(&event_rx),
            UnitEvent::Move {
                id: 0,
                floor: 1,
                direction: Up
            }
        );

        // Act
        // An unacknowledged update only refreshes the queue
        target_tx.send(update(&[4, 5], false)).unwrap();

        // Assert
        assert!(event_rx.recv_timeout(Duration::from_millis(100)).is_err());

        target_tx.send(update(&[4, 5], true)).unwrap();
        assert_eq!(
            expect_event(&event_rx),
            UnitEvent::Move {
                id: 0,
                floor: 2,
                direction: Up
            }
        );

        // Cleanup
        drop(target_tx);
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_follows_new_head() {
        // Arrange
        let (unit_thread, target_tx, event_rx) = setup_unit(1, 200);
        target_tx.send(update(&[3], false)).unwrap();
        assert_eq!(
            expect_event(&event_rx),
            UnitEvent::Move {
                id: 1,
                floor: 1,
                direction: Up
            }
        );
        target_tx.send(update(&[3], true)).unwrap();

        // Act
        // A call below the unit becomes the new head
        target_tx.send(update(&[0, 3], false)).unwrap();

        // Assert
        assert_eq!(
            expect_event(&event_rx),
            UnitEvent::Move {
                id: 1,
                floor: 0,
                direction: Down
            }
        );
        target_tx.send(update(&[0, 3], true)).unwrap();
        assert_eq!(expect_event(&event_rx), UnitEvent::Arrive { id: 1, floor: 0 });
        target_tx.send(update(&[3], true)).unwrap();

        for (floor, direction) in [(1, Up), (2, Up), (3, Down)] {
            assert_eq!(
                expect_event(&event_rx),
                UnitEvent::Move {
                    id: 1,
                    floor,
                    direction
                }
            );
            target_tx.send(update(&[3], true)).unwrap();
        }
        assert_eq!(expect_event(&event_rx), UnitEvent::Arrive { id: 1, floor: 3 });

        // Cleanup
        drop(target_tx);
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_stops_when_controller_disconnects() {
        // Arrange
        let (unit_thread, target_tx, _event_rx) = setup_unit(0, 10);
        target_tx.send(update(&[5], false)).unwrap();

        // Act
        drop(target_tx);

        // Assert
        unit_thread.join().unwrap();
    }
}
