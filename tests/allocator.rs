mod tests {
    use myrtio_ac_dimmer::allocator::{MAX_PINS, ResourceAllocator, SharedAllocator};
    use myrtio_ac_dimmer::AllocError;

    #[test]
    fn test_reserve_generator_is_exclusive() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        assert_eq!(allocator.reserve_generator(2), Ok(()));
        assert_eq!(allocator.reserve_generator(2), Err(AllocError::PinInUse(2)));
        assert_eq!(allocator.reserve_generator(4), Ok(()));
        assert!(allocator.is_generator_reserved(2));
        assert!(allocator.is_generator_reserved(4));
        assert!(!allocator.is_generator_reserved(3));
    }

    #[test]
    fn test_release_generator() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        allocator.reserve_generator(7).unwrap();
        assert!(allocator.release_generator(7));
        assert!(!allocator.release_generator(7));
        assert!(!allocator.is_generator_reserved(7));
        assert_eq!(allocator.reserve_generator(7), Ok(()));
    }

    #[test]
    fn test_invalid_pin() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        assert_eq!(allocator.reserve_generator(MAX_PINS - 1), Ok(()));
        assert_eq!(
            allocator.reserve_generator(MAX_PINS),
            Err(AllocError::InvalidPin(MAX_PINS))
        );
        assert!(!allocator.release_generator(200));
        assert!(!allocator.is_generator_reserved(200));
    }

    #[test]
    fn test_assign_group_reuses_sync_pin() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        assert_eq!(allocator.assign_group(5), Ok(0));
        assert_eq!(allocator.assign_group(5), Ok(0));
        assert_eq!(allocator.assign_group(6), Ok(1));
        assert_eq!(allocator.assign_group(5), Ok(0));
        assert_eq!(allocator.group_of(6), Some(1));
        assert_eq!(allocator.group_of(9), None);
    }

    #[test]
    fn test_assign_group_exhaustion() {
        let mut allocator: ResourceAllocator<2> = ResourceAllocator::new();
        allocator.assign_group(5).unwrap();
        allocator.assign_group(6).unwrap();
        assert_eq!(allocator.free_groups(), 0);
        assert_eq!(allocator.assign_group(7), Err(AllocError::NoGroupAvailable));
        assert_eq!(allocator.assign_group(6), Ok(1));
    }

    #[test]
    fn test_group_count_is_configurable() {
        let mut allocator: ResourceAllocator<3> = ResourceAllocator::new();
        assert_eq!(allocator.free_groups(), 3);
        assert_eq!(allocator.assign_group(1), Ok(0));
        assert_eq!(allocator.assign_group(2), Ok(1));
        assert_eq!(allocator.assign_group(3), Ok(2));
        assert_eq!(allocator.assign_group(4), Err(AllocError::NoGroupAvailable));
    }

    #[test]
    fn test_claim_shares_group() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        assert_eq!(allocator.claim(2, 5), Ok(0));
        assert_eq!(allocator.claim(4, 5), Ok(0));
        assert_eq!(allocator.claim(12, 6), Ok(1));
        assert_eq!(allocator.free_groups(), 0);
    }

    #[test]
    fn test_failed_claim_leaves_registries_untouched() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        allocator.claim(2, 5).unwrap();
        allocator.claim(4, 6).unwrap();

        // group exhausted: generator pin must not be reserved
        assert_eq!(allocator.claim(8, 7), Err(AllocError::NoGroupAvailable));
        assert!(!allocator.is_generator_reserved(8));

        // pin taken: no group may be claimed for the new sync pin
        allocator.reset();
        allocator.claim(2, 5).unwrap();
        assert_eq!(allocator.claim(2, 6), Err(AllocError::PinInUse(2)));
        assert_eq!(allocator.group_of(6), None);
        assert_eq!(allocator.free_groups(), 1);
    }

    #[test]
    fn test_reset() {
        let mut allocator: ResourceAllocator = ResourceAllocator::new();
        allocator.claim(2, 5).unwrap();
        allocator.reset();
        assert!(!allocator.is_generator_reserved(2));
        assert_eq!(allocator.group_of(5), None);
        assert_eq!(allocator.free_groups(), 2);
    }

    #[test]
    fn test_shared_allocator() {
        static ALLOCATOR: SharedAllocator = SharedAllocator::new();
        assert_eq!(ALLOCATOR.lock(|allocator| allocator.claim(2, 5)), Ok(0));
        assert_eq!(
            ALLOCATOR.lock(|allocator| allocator.claim(2, 5)),
            Err(AllocError::PinInUse(2))
        );
        assert!(ALLOCATOR.lock(|allocator| allocator.is_generator_reserved(2)));
    }
}
