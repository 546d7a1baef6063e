use alloy::sol;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface Rarity {
        function summon(uint256 _class) external;
        function adventure(uint256 _summoner) external;
        function xp(uint256 _summoner) external view returns (uint256);
        function level(uint256 _summoner) external view returns (uint256);
        function adventurers_log(uint256 _summoner) external view returns (uint256);
        function xp_required(uint256 curent_lvl) external pure returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface RarityNames {
        function set_name(uint256 summoner, string memory name) external;
        function summoner_name(uint256 summoner) external view returns (string memory);
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface RarityGold {
        function claimable(uint256 summoner) external view returns (uint256);
        function claim(uint256 summoner) external;
    }
);
