use crate::nn::{EarlyStopping, EarlyStoppingDecision, History, Monitor};

#[test]
fn test_early_stopping_tolerates_patience_epochs() {
    let mut es = EarlyStopping::new(Monitor::ValLoss, 3);
    let losses = [1.0, 0.8, 0.85, 0.9, 0.8, 0.95];
    let decisions: Vec<_> = losses
        .iter()
        .enumerate()
        .map(|(epoch, &v)| es.update(epoch, v))
        .collect();

    assert_eq!(
        decisions,
        vec![
            EarlyStoppingDecision::Improved,
            EarlyStoppingDecision::Improved,
            EarlyStoppingDecision::Waiting,
            EarlyStoppingDecision::Waiting,
            // 与最优值相等不算改善
            EarlyStoppingDecision::Waiting,
            EarlyStoppingDecision::Stop,
        ]
    );
    assert_eq!(es.best(), Some(0.8));
    assert_eq!(es.best_epoch(), Some(1));
}

#[test]
fn test_early_stopping_rising_loss_stops_on_fourth_epoch() {
    let mut es = EarlyStopping::new(Monitor::ValLoss, 3);
    let decisions: Vec<_> = [1.0, 1.1, 1.2, 1.3, 1.4]
        .iter()
        .enumerate()
        .map(|(epoch, &v)| es.update(epoch, v))
        .collect();
    assert_eq!(
        decisions,
        vec![
            EarlyStoppingDecision::Improved,
            EarlyStoppingDecision::Waiting,
            EarlyStoppingDecision::Waiting,
            EarlyStoppingDecision::Waiting,
            EarlyStoppingDecision::Stop,
        ]
    );
}

#[test]
fn test_early_stopping_zero_patience() {
    let mut es = EarlyStopping::new(Monitor::ValLoss, 0);
    assert_eq!(es.update(0, 1.0), EarlyStoppingDecision::Improved);
    assert_eq!(es.update(1, 0.5), EarlyStoppingDecision::Improved);
    assert_eq!(es.update(2, 0.6), EarlyStoppingDecision::Stop);
}

#[test]
fn test_early_stopping_improvement_resets_wait() {
    let mut es = EarlyStopping::new(Monitor::ValLoss, 2);
    assert_eq!(es.update(0, 1.0), EarlyStoppingDecision::Improved);
    assert_eq!(es.update(1, 1.1), EarlyStoppingDecision::Waiting);
    assert_eq!(es.update(2, 1.1), EarlyStoppingDecision::Waiting);
    assert_eq!(es.update(3, 0.9), EarlyStoppingDecision::Improved);
    assert_eq!(es.update(4, 1.0), EarlyStoppingDecision::Waiting);
    assert_eq!(es.update(5, 1.0), EarlyStoppingDecision::Waiting);
    assert_eq!(es.update(6, 1.0), EarlyStoppingDecision::Stop);
}

#[test]
fn test_early_stopping_accuracy_mode_and_min_delta() {
    let mut es = EarlyStopping::new(Monitor::ValAccuracy, 1).min_delta(0.05);
    assert_eq!(es.update(0, 0.5), EarlyStoppingDecision::Improved);
    assert_eq!(es.update(1, 0.6), EarlyStoppingDecision::Improved);
    // 提升不足min_delta
    assert_eq!(es.update(2, 0.62), EarlyStoppingDecision::Waiting);
    assert_eq!(es.update(3, 0.64), EarlyStoppingDecision::Stop);
}

#[test]
fn test_early_stopping_nan_is_not_improvement() {
    let mut es = EarlyStopping::new(Monitor::Loss, 1);
    assert_eq!(es.update(0, f32::NAN), EarlyStoppingDecision::Waiting);
    assert_eq!(es.update(1, f32::NAN), EarlyStoppingDecision::Stop);
    assert_eq!(es.best(), None);

    es.reset();
    assert_eq!(es.update(0, 2.0), EarlyStoppingDecision::Improved);
}

#[test]
fn test_history_record_and_json() {
    let mut history = History::default();
    history.record("loss", 1.0);
    history.record("val_loss", 1.5);
    history.finish_epoch();
    history.record("loss", 0.5);
    history.record("val_loss", 1.2);
    history.finish_epoch();
    history.set_stopped_epoch(1);

    assert_eq!(history.loss(), &[1.0, 0.5]);
    assert_eq!(history.last("val_loss"), Some(1.2));
    assert_eq!(history.epochs(), 2);
    assert!(history.stopped_early());
    assert_eq!(history.keys().collect::<Vec<_>>(), vec!["loss", "val_loss"]);

    let json = history.to_json().unwrap();
    let restored: History = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, history);
}
